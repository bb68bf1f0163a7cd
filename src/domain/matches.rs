use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::fines::name_as_player_id;

/// Which of the two teams in a training match; stored as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TeamSide {
    One,
    Two,
}

impl TeamSide {
    pub fn number(self) -> u8 {
        match self {
            TeamSide::One => 1,
            TeamSide::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            TeamSide::One => TeamSide::Two,
            TeamSide::Two => TeamSide::One,
        }
    }
}

impl From<TeamSide> for u8 {
    fn from(side: TeamSide) -> Self {
        side.number()
    }
}

impl TryFrom<u8> for TeamSide {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(TeamSide::One),
            2 => Ok(TeamSide::Two),
            other => Err(format!("winning team must be 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMatch {
    pub match_id: String,
    pub created_at: DateTime<Utc>,
    pub date: DateTime<Utc>,
    pub team1: Vec<String>,
    pub team2: Vec<String>,
    pub status: MatchStatus,
    #[serde(default)]
    pub winning_team: Option<TeamSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TrainingMatch {
    pub fn pending(match_id: String, team1: Vec<String>, team2: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            match_id,
            created_at: now,
            date: now,
            team1,
            team2,
            status: MatchStatus::Pending,
            winning_team: None,
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    /// Completed matches always carry a winner; anything else yields `None`.
    pub fn winner(&self) -> Option<TeamSide> {
        match self.status {
            MatchStatus::Completed => self.winning_team,
            MatchStatus::Pending => None,
        }
    }

    pub fn team(&self, side: TeamSide) -> &[String] {
        match side {
            TeamSide::One => &self.team1,
            TeamSide::Two => &self.team2,
        }
    }

    pub fn losers(&self) -> Option<&[String]> {
        self.winner().map(|side| self.team(side.other()))
    }

    /// pending -> completed, exactly once.
    pub fn complete(&mut self, winner: TeamSide, now: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = MatchStatus::Completed;
        self.winning_team = Some(winner);
        self.completed_at = Some(now);
        true
    }
}

/// Reject empty teams and any name listed twice, within or across teams.
///
/// Names are compared by the player id they map to, so "Anna Holm" and
/// "Anna_Holm" count as the same player.
pub fn validate_teams(team1: &[String], team2: &[String]) -> Result<()> {
    if team1.is_empty() || team2.is_empty() {
        bail!("Both teams need at least one player");
    }

    let mut seen: HashMap<String, &str> = HashMap::new();
    for player in team1.iter().chain(team2) {
        if player.trim().is_empty() {
            bail!("Player names must not be blank");
        }
        if let Some(earlier) = seen.insert(name_as_player_id(player), player.as_str()) {
            if earlier == player.as_str() {
                bail!("Player {player:?} appears more than once");
            }
            bail!("Players {earlier:?} and {player:?} cannot be told apart");
        }
    }
    Ok(())
}
