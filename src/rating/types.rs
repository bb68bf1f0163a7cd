use serde::Serialize;
use std::collections::HashMap;

pub type PlayerName = String;
pub type StatisticsMap = HashMap<PlayerName, PlayerStatistic>;

/// Neutral rate for players without completed matches.
pub const DEFAULT_WIN_RATE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerStatistic {
    pub wins: u32,
    pub losses: u32,
    pub matches: u32,
    pub win_rate: f64,
}

impl PlayerStatistic {
    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.matches = self.wins + self.losses;
        self.win_rate = self.wins as f64 / self.matches as f64;
    }
}

/// Anything that can rate a player for the balancer.
pub trait WinRates {
    fn win_rate(&self, player: &str) -> f64;
}

impl WinRates for HashMap<String, f64> {
    fn win_rate(&self, player: &str) -> f64 {
        self.get(player).copied().unwrap_or(DEFAULT_WIN_RATE)
    }
}
