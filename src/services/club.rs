use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::RosterSource;
use crate::balancing::{Strategy, TeamBalancer, TeamPartition};
use crate::config::AppConfig;
use crate::domain::{
    FineEvent, FineRecord, FineType, MemberRecord, TeamSide, fine_key, name_as_player_id,
};
use crate::fines::{FineCalculator, member_names};
use crate::history::MatchHistory;
use crate::ledger::{FineLedger, FineTypeCatalog};
use crate::rating::PlayerStatistics;
use crate::services::results::{MatchOutcome, TrainingResults};
use crate::storage::JsonFile;

pub type MemberDirectory = BTreeMap<String, MemberRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub events: usize,
    pub members: usize,
    pub fines_added: usize,
}

/// Owns every persisted collection of one club.
///
/// Player statistics are derived from the match history and cached until the
/// history changes through this object.
pub struct Club {
    config: AppConfig,
    ledger: FineLedger,
    history: MatchHistory,
    catalog: FineTypeCatalog,
    members: JsonFile<MemberDirectory>,
    statistics: Option<PlayerStatistics>,
}

impl Club {
    pub fn open(config: AppConfig) -> Self {
        let storage = &config.storage;
        info!("Using data directory {}", storage.data_dir.display());

        Self {
            ledger: FineLedger::new(storage.fines_path()),
            history: MatchHistory::new(storage.matches_path()),
            catalog: FineTypeCatalog::new(storage.fine_types_path()),
            members: JsonFile::new(storage.members_path()),
            statistics: None,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn ledger(&self) -> &FineLedger {
        &self.ledger
    }

    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    pub fn catalog(&self) -> &FineTypeCatalog {
        &self.catalog
    }

    pub fn members(&self) -> MemberDirectory {
        self.members.load()
    }

    pub fn statistics(&mut self) -> &PlayerStatistics {
        let default_win_rate = self.config.balance.default_win_rate;
        let history = &self.history;
        self.statistics
            .get_or_insert_with(|| PlayerStatistics::from_history(&history.completed(), default_win_rate))
    }

    pub fn generate_teams<R: Rng + ?Sized>(
        &mut self,
        players: &[String],
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<TeamPartition> {
        let settings = self.config.balance.clone();
        let statistics = self.statistics();
        TeamBalancer::new(statistics, &settings).generate_teams(players, strategy, rng)
    }

    // --- Match history ---

    pub fn create_match(&mut self, team1: Vec<String>, team2: Vec<String>) -> Result<String> {
        self.history.create_pending(team1, team2)
    }

    pub fn delete_match(&mut self, match_id: &str) -> Result<bool> {
        self.history.delete(match_id)
    }

    pub fn complete_match(&mut self, match_id: &str, winner: TeamSide) -> Result<Option<MatchOutcome>> {
        let outcome = self.results().complete(match_id, winner);
        self.statistics = None;
        outcome
    }

    pub fn log_match(
        &mut self,
        team1: Vec<String>,
        team2: Vec<String>,
        winner: TeamSide,
    ) -> Result<MatchOutcome> {
        let outcome = self.results().log_result(team1, team2, winner);
        self.statistics = None;
        outcome
    }

    // --- Fines ---

    /// `Ok(None)` when the fine type is not in the catalog.
    pub fn issue_manual_fine(&self, type_id: &str, player_name: &str) -> Result<Option<(String, FineRecord)>> {
        self.issue_manual_fine_at(type_id, player_name, Utc::now())
    }

    fn issue_manual_fine_at(
        &self,
        type_id: &str,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(String, FineRecord)>> {
        let Some(fine_type) = self.catalog.get(type_id) else {
            warn!("Unknown fine type {type_id}");
            return Ok(None);
        };

        let event = FineEvent {
            id: format!("MANUAL_{}_{}", fine_type.id, now.format("%Y%m%d_%H%M%S_%6f")),
            name: fine_type.name.clone(),
            date: now,
        };
        let player_id = self.player_id_for(player_name);
        let key = fine_key(&event.id, &player_id);
        let record = FineRecord::new(
            FineType::Manual,
            fine_type.amount,
            player_id,
            player_name.trim(),
            &event,
            now,
        )
        .with_subtype(fine_type.name);

        if !self.ledger.add_if_absent(&key, record.clone())? {
            bail!("Fine {key} already exists");
        }
        info!("Issued {} fine to {}", type_id, player_name.trim());
        Ok(Some((key, record)))
    }

    /// Fetch a roster and fine every event in it. Nothing is written when the
    /// fetch fails.
    pub async fn sync<S: RosterSource>(&self, source: &mut S) -> Result<SyncReport> {
        info!("Starting roster sync");
        let roster = source
            .fetch_roster()
            .await
            .context("Failed to fetch roster")?;

        let directory: MemberDirectory = roster
            .members
            .iter()
            .map(|member| (member.id.clone(), member.to_record()))
            .collect();
        self.members.save(&directory)?;
        info!("Saved {} members", directory.len());

        let names = member_names(&roster.members);
        let calculator = FineCalculator::new(&self.config.fines);
        let fines = calculator.calculate_all(&roster.events, &names, &self.ledger.records(), Utc::now());
        let fines_added = self.ledger.add_all_if_absent(fines)?;

        let report = SyncReport {
            events: roster.events.len(),
            members: roster.members.len(),
            fines_added,
        };
        info!(
            "Synced {} events and {} members, {} new fines",
            report.events, report.members, report.fines_added
        );
        Ok(report)
    }

    // --- Helper Methods ---

    fn results(&self) -> TrainingResults<'_> {
        TrainingResults::new(&self.history, &self.ledger, &self.config.fines)
    }

    /// Roster id when the name belongs to a known member.
    fn player_id_for(&self, player_name: &str) -> String {
        let name = player_name.trim();
        self.members
            .load()
            .into_values()
            .find(|member| member.name == name)
            .map(|member| member.id)
            .unwrap_or_else(|| name_as_player_id(name))
    }
}
