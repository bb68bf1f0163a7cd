use rand::Rng;
use rand::seq::SliceRandom;

use super::types::Split;
use crate::rating::WinRates;

#[derive(Default)]
struct TeamBuilder {
    players: Vec<String>,
    total: f64,
}

impl TeamBuilder {
    fn len(&self) -> usize {
        self.players.len()
    }

    fn strength(&self) -> f64 {
        if self.players.is_empty() {
            0.0
        } else {
            self.total / self.players.len() as f64
        }
    }

    fn strength_with(&self, rate: f64) -> f64 {
        (self.total + rate) / (self.players.len() + 1) as f64
    }

    fn push(&mut self, player: &str, rate: f64) {
        self.players.push(player.to_string());
        self.total += rate;
    }
}

/// One-step lookahead assignment over a uniformly shuffled player order.
pub(crate) fn split_greedy<W, R>(rates: &W, players: &[String], rng: &mut R) -> Split
where
    W: WinRates + ?Sized,
    R: Rng + ?Sized,
{
    let team_size = players.len() / 2;

    let mut order: Vec<(&String, f64)> = players
        .iter()
        .map(|player| (player, rates.win_rate(player)))
        .collect();
    order.shuffle(rng);

    let mut team1 = TeamBuilder::default();
    let mut team2 = TeamBuilder::default();
    let mut remaining = Vec::new();

    for (player, rate) in order {
        let team1_full = team1.len() >= team_size;
        let team2_full = team2.len() >= team_size;

        match (team1_full, team2_full) {
            (true, true) => remaining.push(player.clone()),
            (true, false) => team2.push(player, rate),
            (false, true) => team1.push(player, rate),
            (false, false) => {
                let diff_if_team1 = (team1.strength_with(rate) - team2.strength()).abs();
                let diff_if_team2 = (team2.strength_with(rate) - team1.strength()).abs();
                if diff_if_team1 <= diff_if_team2 {
                    team1.push(player, rate);
                } else {
                    team2.push(player, rate);
                }
            }
        }
    }

    Split {
        team1: team1.players,
        team2: team2.players,
        remaining,
    }
}
