//! Match History Store: training matches persisted as one JSON list.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;
use std::path::Path;

use crate::domain::{MatchStatus, TeamSide, TrainingMatch, validate_teams};
use crate::storage::JsonFile;

const MAX_ID_ATTEMPTS: usize = 16;

pub struct MatchHistory {
    file: JsonFile<Vec<TrainingMatch>>,
}

/// Completed-match wins per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TeamWinCounts {
    pub team1: u32,
    pub team2: u32,
}

impl MatchHistory {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn load(&self) -> Vec<TrainingMatch> {
        self.file.load()
    }

    /// Store confirmed teams before the match is played.
    pub fn create_pending(&self, team1: Vec<String>, team2: Vec<String>) -> Result<String> {
        validate_teams(&team1, &team2)?;
        let now = Utc::now();

        let (_, match_id) = self.file.modify(|matches| {
            let match_id = unique_match_id(matches, now, &mut rand::thread_rng());
            matches.push(TrainingMatch::pending(match_id.clone(), team1, team2, now));
            (match_id, true)
        })?;

        info!("Created pending match {match_id}");
        Ok(match_id)
    }

    /// Store a match whose result is already known.
    pub fn log_completed(
        &self,
        team1: Vec<String>,
        team2: Vec<String>,
        winner: TeamSide,
    ) -> Result<String> {
        validate_teams(&team1, &team2)?;
        let now = Utc::now();

        let (_, match_id) = self.file.modify(|matches| {
            let match_id = unique_match_id(matches, now, &mut rand::thread_rng());
            let mut record = TrainingMatch::pending(match_id.clone(), team1, team2, now);
            record.complete(winner, now);
            matches.push(record);
            (match_id, true)
        })?;

        info!("Logged completed match {match_id}, {winner} won");
        Ok(match_id)
    }

    /// `Ok(false)` when the match is unknown or already completed.
    pub fn complete(&self, match_id: &str, winner: TeamSide) -> Result<bool> {
        let now = Utc::now();
        let (_, completed) = self.file.modify(|matches| {
            let completed = matches
                .iter_mut()
                .find(|m| m.match_id == match_id)
                .is_some_and(|m| m.complete(winner, now));
            (completed, completed)
        })?;

        if completed {
            info!("Completed match {match_id}, {winner} won");
        } else {
            warn!("Match {match_id} not found or not pending");
        }
        Ok(completed)
    }

    /// Only pending matches can be deleted.
    pub fn delete(&self, match_id: &str) -> Result<bool> {
        let (_, deleted) = self.file.modify(|matches| {
            let position = matches
                .iter()
                .position(|m| m.match_id == match_id && m.is_pending());
            match position {
                Some(idx) => {
                    matches.remove(idx);
                    (true, true)
                }
                None => (false, false),
            }
        })?;

        if deleted {
            info!("Deleted pending match {match_id}");
        }
        Ok(deleted)
    }

    pub fn get(&self, match_id: &str) -> Option<TrainingMatch> {
        self.load().into_iter().find(|m| m.match_id == match_id)
    }

    pub fn list(&self, status: Option<MatchStatus>) -> Vec<TrainingMatch> {
        let mut matches = self.load();
        if let Some(status) = status {
            matches.retain(|m| m.status == status);
        }
        matches
    }

    pub fn completed(&self) -> Vec<TrainingMatch> {
        self.list(Some(MatchStatus::Completed))
    }

    pub fn team_win_counts(&self) -> TeamWinCounts {
        self.load()
            .iter()
            .filter_map(TrainingMatch::winner)
            .fold(TeamWinCounts::default(), |mut counts, side| {
                match side {
                    TeamSide::One => counts.team1 += 1,
                    TeamSide::Two => counts.team2 += 1,
                }
                counts
            })
    }
}

/// Timestamp down to microseconds plus a random suffix, retried until unused.
fn unique_match_id<R: Rng + ?Sized>(
    existing: &[TrainingMatch],
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    let stamp = now.format("%Y%m%d_%H%M%S_%6f");
    let mut candidate = format!("{stamp}_{:04x}", rng.r#gen::<u16>());

    for _ in 0..MAX_ID_ATTEMPTS {
        if !existing.iter().any(|m| m.match_id == candidate) {
            break;
        }
        candidate = format!("{stamp}_{:04x}", rng.r#gen::<u16>());
    }

    // Widen the suffix if every short candidate collided.
    while existing.iter().any(|m| m.match_id == candidate) {
        candidate = format!("{stamp}_{:016x}", rng.r#gen::<u64>());
    }
    candidate
}
