use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{FineRecord, FineType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerTotals {
    pub total_fines: u32,
    pub total_amount: u64,
    pub paid_fines: u32,
    pub paid_amount: u64,
    pub unpaid_amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total_fines: u32,
    pub total_amount: u64,
    pub paid_fines: u32,
    pub unpaid_amount: u64,
    /// Keyed by player name.
    pub player_totals: BTreeMap<String, PlayerTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FineDetail {
    pub key: String,
    pub event_id: String,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub fine_type: FineType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_subtype: Option<String>,
    pub fine_amount: u32,
    pub paid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerFines {
    pub total_fine: u64,
    pub unpaid_amount: u64,
    pub no_show_count: u32,
    pub late_response_count: u32,
    pub training_loss_count: u32,
    pub manual_count: u32,
    pub events: Vec<FineDetail>,
}

pub(super) fn summarize<'a, I>(records: I) -> LedgerSummary
where
    I: IntoIterator<Item = &'a FineRecord>,
{
    let mut summary = LedgerSummary::default();

    for record in records {
        let amount = u64::from(record.fine_amount);
        summary.total_fines += 1;
        summary.total_amount += amount;

        let player = summary
            .player_totals
            .entry(record.player_name.clone())
            .or_default();
        player.total_fines += 1;
        player.total_amount += amount;

        if record.paid {
            summary.paid_fines += 1;
            player.paid_fines += 1;
            player.paid_amount += amount;
        } else {
            summary.unpaid_amount += amount;
            player.unpaid_amount += amount;
        }
    }

    summary
}

/// Group by player name; each player's rows are ordered newest event first.
pub(super) fn group_by_player<'a, I>(records: I) -> BTreeMap<String, PlayerFines>
where
    I: IntoIterator<Item = (&'a String, &'a FineRecord)>,
{
    let mut players: BTreeMap<String, PlayerFines> = BTreeMap::new();

    for (key, record) in records {
        let entry = players.entry(record.player_name.clone()).or_default();
        let amount = u64::from(record.fine_amount);

        entry.total_fine += amount;
        if !record.paid {
            entry.unpaid_amount += amount;
        }
        match record.fine_type {
            FineType::MissingEvent => entry.no_show_count += 1,
            FineType::NoResponse24h => entry.late_response_count += 1,
            FineType::TrainingLoss => entry.training_loss_count += 1,
            FineType::Manual => entry.manual_count += 1,
        }
        entry.events.push(FineDetail {
            key: key.clone(),
            event_id: record.event_id.clone(),
            event_name: record.event_name.clone(),
            event_date: record.event_date,
            fine_type: record.fine_type,
            fine_subtype: record.fine_subtype.clone(),
            fine_amount: record.fine_amount,
            paid: record.paid,
        });
    }

    for entry in players.values_mut() {
        entry.events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
    }
    players
}
