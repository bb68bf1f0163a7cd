//! Splits a group of players into two equally sized, equally strong teams.
//!
//! Strength is the mean win rate of a team. For `n` players both teams get
//! `n / 2` players and an odd player out is kept as reserve.

mod greedy;
mod optimal;
pub mod types;

pub use types::{BalanceInfo, PlayerRate, Strategy, TeamPartition};

use anyhow::{Result, bail};
use log::{debug, info};
use rand::Rng;
use std::collections::HashSet;

use crate::config::BalanceSettings;
use crate::rating::WinRates;
use greedy::split_greedy;
use optimal::split_optimal;
use types::Split;

pub struct TeamBalancer<'a, W: WinRates + ?Sized> {
    rates: &'a W,
    settings: &'a BalanceSettings,
}

impl<'a, W: WinRates + ?Sized> TeamBalancer<'a, W> {
    pub fn new(rates: &'a W, settings: &'a BalanceSettings) -> Self {
        Self { rates, settings }
    }

    /// Mean win rate of the team, `0.0` when empty.
    pub fn team_strength(&self, team: &[String]) -> f64 {
        if team.is_empty() {
            return 0.0;
        }
        let total: f64 = team.iter().map(|p| self.rates.win_rate(p)).sum();
        total / team.len() as f64
    }

    /// Duplicate names are rejected. Fewer than two players all end up in
    /// `remaining` with both teams empty.
    pub fn generate_teams<R: Rng + ?Sized>(
        &self,
        players: &[String],
        strategy: Strategy,
        rng: &mut R,
    ) -> Result<TeamPartition> {
        ensure_unique(players)?;

        if players.len() < 2 {
            let split = Split {
                remaining: players.to_vec(),
                ..Split::default()
            };
            return Ok(self.finish(split, strategy));
        }

        let (split, used) = match strategy {
            Strategy::Greedy => (self.greedy(players, rng), Strategy::Greedy),
            Strategy::Optimal => self.optimal(players, rng),
        };

        info!(
            "Generated teams of {} for {} players using {} strategy",
            split.team1.len(),
            players.len(),
            used.as_str()
        );
        Ok(self.finish(split, used))
    }

    pub fn balance_info(&self, team1: &[String], team2: &[String]) -> BalanceInfo {
        let team1_strength = self.team_strength(team1);
        let team2_strength = self.team_strength(team2);
        let strength_difference = (team1_strength - team2_strength).abs();

        BalanceInfo {
            team1_strength,
            team2_strength,
            strength_difference,
            balance_percentage: (1.0 - strength_difference) * 100.0,
            team1_players_stats: self.player_rates(team1),
            team2_players_stats: self.player_rates(team2),
        }
    }

    // --- Helper Methods ---

    fn greedy<R: Rng + ?Sized>(&self, players: &[String], rng: &mut R) -> Split {
        split_greedy(self.rates, players, rng)
    }

    fn optimal<R: Rng + ?Sized>(&self, players: &[String], rng: &mut R) -> (Split, Strategy) {
        if players.len() > self.settings.optimal_player_limit {
            debug!(
                "{} players exceeds optimal search limit of {}, using greedy",
                players.len(),
                self.settings.optimal_player_limit
            );
            return (self.greedy(players, rng), Strategy::Greedy);
        }

        match split_optimal(self.rates, players, self.settings, rng) {
            Some(split) => (split, Strategy::Optimal),
            None => (self.greedy(players, rng), Strategy::Greedy),
        }
    }

    fn finish(&self, split: Split, strategy: Strategy) -> TeamPartition {
        let balance = self.balance_info(&split.team1, &split.team2);
        TeamPartition {
            team1: split.team1,
            team2: split.team2,
            remaining: split.remaining,
            balance,
            strategy,
        }
    }

    fn player_rates(&self, team: &[String]) -> Vec<PlayerRate> {
        team.iter()
            .map(|name| PlayerRate {
                name: name.clone(),
                win_rate: self.rates.win_rate(name),
            })
            .collect()
    }
}

fn ensure_unique(players: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if !seen.insert(player.as_str()) {
            bail!("Player {player:?} is listed more than once");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn team_strength_is_mean_win_rate() {
        let rates: HashMap<String, f64> =
            [("A".to_string(), 1.0), ("B".to_string(), 0.0)].into_iter().collect();
        let settings = BalanceSettings::default();
        let balancer = TeamBalancer::new(&rates, &settings);

        assert_eq!(balancer.team_strength(&names(&["A", "B"])), 0.5);
        assert_eq!(balancer.team_strength(&names(&["A", "Unknown"])), 0.75);
        assert_eq!(balancer.team_strength(&[]), 0.0);
    }

    #[test]
    fn balance_info_describes_both_teams() {
        let rates: HashMap<String, f64> =
            [("A".to_string(), 0.8), ("B".to_string(), 0.4)].into_iter().collect();
        let settings = BalanceSettings::default();
        let balancer = TeamBalancer::new(&rates, &settings);

        let info = balancer.balance_info(&names(&["A"]), &names(&["B"]));
        assert!((info.strength_difference - 0.4).abs() < 1e-9);
        assert!((info.balance_percentage - 60.0).abs() < 1e-9);
        assert_eq!(info.team1_players_stats[0].name, "A");
        assert_eq!(info.team2_players_stats[0].win_rate, 0.4);
    }

    #[test]
    fn rejects_duplicate_names() {
        let rates: HashMap<String, f64> = HashMap::new();
        let settings = BalanceSettings::default();
        let balancer = TeamBalancer::new(&rates, &settings);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = balancer.generate_teams(&names(&["A", "B", "A"]), Strategy::Greedy, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn single_player_goes_to_reserve() {
        let rates: HashMap<String, f64> = HashMap::new();
        let settings = BalanceSettings::default();
        let balancer = TeamBalancer::new(&rates, &settings);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let partition = balancer
            .generate_teams(&names(&["Solo"]), Strategy::Optimal, &mut rng)
            .unwrap();
        assert!(partition.team1.is_empty() && partition.team2.is_empty());
        assert_eq!(partition.remaining, names(&["Solo"]));
        assert_eq!(partition.balance.strength_difference, 0.0);
    }

    #[test]
    fn large_groups_fall_back_to_greedy() {
        let rates: HashMap<String, f64> = HashMap::new();
        let settings = BalanceSettings::default();
        let balancer = TeamBalancer::new(&rates, &settings);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let players: Vec<String> = (0..17).map(|i| format!("P{i}")).collect();

        let partition = balancer
            .generate_teams(&players, Strategy::Optimal, &mut rng)
            .unwrap();
        assert_eq!(partition.strategy, Strategy::Greedy);
        assert_eq!(partition.team1.len(), 8);
        assert_eq!(partition.remaining.len(), 1);
    }
}
