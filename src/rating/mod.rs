pub mod types;
pub mod win_rate;

pub use types::{DEFAULT_WIN_RATE, PlayerStatistic, StatisticsMap, WinRates};
pub use win_rate::compute_statistics;

use std::cmp::Ordering;

use crate::domain::TrainingMatch;

/// Derived per-player statistics with the neutral default for unknown players.
#[derive(Debug, Clone)]
pub struct PlayerStatistics {
    stats: StatisticsMap,
    default_win_rate: f64,
}

impl PlayerStatistics {
    pub fn from_history(matches: &[TrainingMatch], default_win_rate: f64) -> Self {
        Self {
            stats: compute_statistics(matches),
            default_win_rate,
        }
    }

    pub fn empty(default_win_rate: f64) -> Self {
        Self {
            stats: StatisticsMap::new(),
            default_win_rate,
        }
    }

    pub fn get(&self, player: &str) -> Option<&PlayerStatistic> {
        self.stats.get(player)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn default_win_rate(&self) -> f64 {
        self.default_win_rate
    }

    /// Best win rate first, more matches breaking ties, then name.
    pub fn ranked(&self) -> Vec<(&str, &PlayerStatistic)> {
        let mut rows: Vec<_> = self
            .stats
            .iter()
            .map(|(name, stat)| (name.as_str(), stat))
            .collect();
        rows.sort_by(|(name_a, a), (name_b, b)| {
            b.win_rate
                .partial_cmp(&a.win_rate)
                .unwrap_or(Ordering::Equal)
                .then(b.matches.cmp(&a.matches))
                .then(name_a.cmp(name_b))
        });
        rows
    }
}

impl WinRates for PlayerStatistics {
    fn win_rate(&self, player: &str) -> f64 {
        match self.stats.get(player) {
            Some(stat) if stat.matches > 0 => stat.win_rate,
            _ => self.default_win_rate,
        }
    }
}
