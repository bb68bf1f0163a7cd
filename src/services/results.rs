use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::Serialize;

use crate::config::FineSettings;
use crate::domain::{FineEvent, FineRecord, FineType, TeamSide, TrainingMatch, name_as_player_id};
use crate::history::MatchHistory;
use crate::ledger::FineLedger;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub match_id: String,
    pub winning_team: TeamSide,
    pub fines_added: usize,
}

/// Records training-match results and fines the losing side.
pub struct TrainingResults<'a> {
    history: &'a MatchHistory,
    ledger: &'a FineLedger,
    settings: &'a FineSettings,
}

impl<'a> TrainingResults<'a> {
    pub fn new(history: &'a MatchHistory, ledger: &'a FineLedger, settings: &'a FineSettings) -> Self {
        Self {
            history,
            ledger,
            settings,
        }
    }

    /// `Ok(None)` when the match is unknown or no longer pending.
    ///
    /// Loss fines are written before the match is marked completed, so a
    /// failed write leaves the match pending and the call can be retried.
    pub fn complete(&self, match_id: &str, winner: TeamSide) -> Result<Option<MatchOutcome>> {
        let Some(training_match) = self.history.get(match_id).filter(TrainingMatch::is_pending) else {
            return Ok(None);
        };

        let fines = loss_fines(
            match_id,
            winner,
            training_match.team(winner.other()),
            self.settings.training_loss_fine,
            Utc::now(),
        );
        let added = self.ledger.insert_missing(fines)?;

        match self.history.complete(match_id, winner) {
            Ok(true) => {}
            Ok(false) => {
                self.rollback(match_id, &added);
                return Ok(None);
            }
            Err(e) => {
                self.rollback(match_id, &added);
                return Err(e);
            }
        }

        info!(
            "Match {match_id} recorded, {} training-loss fines added",
            added.len()
        );
        Ok(Some(MatchOutcome {
            match_id: match_id.to_string(),
            winning_team: winner,
            fines_added: added.len(),
        }))
    }

    /// Stores the teams as a pending match and completes it right away; the
    /// match is dropped again if completing fails.
    pub fn log_result(
        &self,
        team1: Vec<String>,
        team2: Vec<String>,
        winner: TeamSide,
    ) -> Result<MatchOutcome> {
        let match_id = self.history.create_pending(team1, team2)?;

        let completed = self.complete(&match_id, winner);
        if !matches!(completed, Ok(Some(_))) {
            if let Err(e) = self.history.delete(&match_id) {
                error!("Could not drop unfinished match {match_id}: {e:#}");
            }
        }
        completed?.with_context(|| format!("Match {match_id} could not be completed"))
    }

    // --- Helper Methods ---

    fn rollback(&self, match_id: &str, added: &[String]) {
        warn!("Completing match {match_id} failed, withdrawing its loss fines");
        if let Err(e) = self.ledger.remove_all(added) {
            error!("Could not withdraw loss fines of match {match_id}: {e:#}");
        }
    }
}

/// Keys depend only on the match id and the player, so repeats are no-ops.
pub fn loss_fines(
    match_id: &str,
    winner: TeamSide,
    losers: &[String],
    amount: u32,
    when: DateTime<Utc>,
) -> Vec<(String, FineRecord)> {
    let event = FineEvent {
        id: format!("TRAINING_MATCH_{match_id}"),
        name: format!("Training match - {winner} won"),
        date: when,
    };

    losers
        .iter()
        .map(|player| {
            let player_id = name_as_player_id(player);
            let key = format!("{}_{}", event.id, player_id);
            let record =
                FineRecord::new(FineType::TrainingLoss, amount, player_id, player.as_str(), &event, when);
            (key, record)
        })
        .collect()
}
