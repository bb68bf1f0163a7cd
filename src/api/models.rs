use serde::{Deserialize, Serialize};

use crate::balancing::Strategy;
use crate::domain::{FineRecord, MatchStatus, TeamSide};
use crate::history::TeamWinCounts;

// --- Requests ---

#[derive(Debug, Deserialize)]
pub struct TeamsRequest {
    pub players: Vec<String>,
    #[serde(default)]
    pub strategy: Strategy,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub team1: Vec<String>,
    pub team2: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogMatchRequest {
    pub team1: Vec<String>,
    pub team2: Vec<String>,
    pub winning_team: TeamSide,
}

#[derive(Debug, Deserialize)]
pub struct CompleteMatchRequest {
    pub winning_team: TeamSide,
}

#[derive(Debug, Deserialize)]
pub struct MatchListParams {
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: u32,
}

#[derive(Debug, Deserialize)]
pub struct FineTypeRequest {
    pub name: String,
    pub amount: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ManualFineRequest {
    pub type_id: String,
    pub player_name: String,
}

// --- Responses ---

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerStatRow {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub matches: u32,
    pub win_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub players: Vec<PlayerStatRow>,
    pub team_wins: TeamWinCounts,
    pub default_win_rate: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedMatch {
    pub match_id: String,
}

#[derive(Debug, Serialize)]
pub struct KeyedFine {
    pub key: String,
    #[serde(flatten)]
    pub record: FineRecord,
}
