use itertools::Itertools;
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use super::types::Split;
use crate::config::BalanceSettings;
use crate::rating::WinRates;

struct Candidate {
    difference: f64,
    team1: Vec<usize>,
    team2: Vec<usize>,
    reserve: Option<usize>,
}

/// Evaluates shuffled team1 subsets until the budget runs out or a split is
/// within `early_exit_difference`. Returns `None` when nothing was evaluated.
pub(crate) fn split_optimal<W, R>(
    rates: &W,
    players: &[String],
    settings: &BalanceSettings,
    rng: &mut R,
) -> Option<Split>
where
    W: WinRates + ?Sized,
    R: Rng + ?Sized,
{
    let n_players = players.len();
    let team_size = n_players / 2;
    if team_size == 0 {
        return None;
    }

    let player_rates: Vec<f64> = players.iter().map(|p| rates.win_rate(p)).collect();

    let mut combinations: Vec<Vec<usize>> = (0..n_players).combinations(team_size).collect();
    combinations.shuffle(rng);

    let mut best: Option<Candidate> = None;
    let mut evaluated = 0;

    for team1 in combinations.into_iter().take(settings.max_iterations) {
        evaluated += 1;
        let candidate = evaluate(team1, &player_rates, team_size);
        let difference = candidate.difference;

        if best.as_ref().is_none_or(|b| difference < b.difference) {
            best = Some(candidate);
        }

        if difference < settings.early_exit_difference {
            break;
        }
    }

    debug!(
        "Optimal search evaluated {} splits for {} players",
        evaluated, n_players
    );

    best.map(|candidate| to_split(candidate, players))
}

fn evaluate(team1: Vec<usize>, rates: &[f64], team_size: usize) -> Candidate {
    let mut in_team1 = vec![false; rates.len()];
    for &idx in &team1 {
        in_team1[idx] = true;
    }
    let rest: Vec<usize> = (0..rates.len()).filter(|&i| !in_team1[i]).collect();

    let strength1 = team1.iter().map(|&i| rates[i]).sum::<f64>() / team_size as f64;
    let rest_total: f64 = rest.iter().map(|&i| rates[i]).sum();

    if rest.len() == team_size {
        let strength2 = rest_total / team_size as f64;
        return Candidate {
            difference: (strength1 - strength2).abs(),
            team1,
            team2: rest,
            reserve: None,
        };
    }

    // Odd count: bench whichever leftover keeps the two teams closest.
    let (reserve_pos, difference) = rest
        .iter()
        .enumerate()
        .map(|(pos, &i)| {
            let strength2 = (rest_total - rates[i]) / team_size as f64;
            (pos, (strength1 - strength2).abs())
        })
        .fold((0, f64::INFINITY), |acc, item| if item.1 < acc.1 { item } else { acc });

    let mut team2 = rest;
    let reserve = team2.remove(reserve_pos);
    Candidate {
        difference,
        team1,
        team2,
        reserve: Some(reserve),
    }
}

fn to_split(candidate: Candidate, players: &[String]) -> Split {
    let pick = |indices: &[usize]| -> Vec<String> {
        indices.iter().map(|&i| players[i].clone()).collect()
    };
    Split {
        team1: pick(&candidate.team1),
        team2: pick(&candidate.team2),
        remaining: candidate.reserve.map(|i| vec![players[i].clone()]).unwrap_or_default(),
    }
}
