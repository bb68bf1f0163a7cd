use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Shuffle, then place each player where the strengths end up closest
    Greedy,
    /// Randomized search over team1 subsets, falling back to greedy for big groups
    #[default]
    Optimal,
}

impl Strategy {
    pub fn as_str(&self) -> &str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::Optimal => "optimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRate {
    pub name: String,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceInfo {
    pub team1_strength: f64,
    pub team2_strength: f64,
    pub strength_difference: f64,
    pub balance_percentage: f64,
    pub team1_players_stats: Vec<PlayerRate>,
    pub team2_players_stats: Vec<PlayerRate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPartition {
    pub team1: Vec<String>,
    pub team2: Vec<String>,
    /// Reserve for odd player counts.
    pub remaining: Vec<String>,
    pub balance: BalanceInfo,
    /// Algorithm that actually produced the split.
    pub strategy: Strategy,
}

/// Raw assignment before balance info is attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Split {
    pub team1: Vec<String>,
    pub team2: Vec<String>,
    pub remaining: Vec<String>,
}
