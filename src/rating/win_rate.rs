use log::debug;

use super::types::StatisticsMap;
use crate::domain::TrainingMatch;

/// Accumulates wins and losses per player over every completed match.
///
/// Pending matches (and anything without a recorded winner) are ignored.
pub fn compute_statistics(matches: &[TrainingMatch]) -> StatisticsMap {
    let mut stats = StatisticsMap::new();
    let mut counted = 0;

    for training_match in matches {
        let Some(winner) = training_match.winner() else {
            continue;
        };
        counted += 1;

        record_team(&mut stats, training_match.team(winner), true);
        record_team(&mut stats, training_match.team(winner.other()), false);
    }

    debug!(
        "Computed statistics for {} players from {} completed matches",
        stats.len(),
        counted
    );
    stats
}

fn record_team(stats: &mut StatisticsMap, players: &[String], won: bool) {
    for player in players {
        stats.entry(player.clone()).or_default().record(won);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TeamSide;
    use chrono::Utc;

    fn played(team1: &[&str], team2: &[&str], winner: Option<TeamSide>) -> TrainingMatch {
        let mut m = TrainingMatch::pending(
            format!("m-{}", team1.join("")),
            team1.iter().map(|s| s.to_string()).collect(),
            team2.iter().map(|s| s.to_string()).collect(),
            Utc::now(),
        );
        if let Some(side) = winner {
            m.complete(side, Utc::now());
        }
        m
    }

    #[test]
    fn accumulates_across_matches() {
        let history = vec![
            played(&["A", "B"], &["C", "D"], Some(TeamSide::One)),
            played(&["A", "C"], &["B", "D"], Some(TeamSide::Two)),
        ];
        let stats = compute_statistics(&history);

        let a = stats["A"];
        assert_eq!((a.wins, a.losses, a.matches), (1, 1, 2));
        assert_eq!(a.win_rate, 0.5);
        assert_eq!(stats["B"].win_rate, 1.0);
        assert_eq!(stats["C"].win_rate, 0.0);
        assert_eq!(stats["D"].matches, 2);
    }

    #[test]
    fn ignores_pending_matches() {
        let history = vec![played(&["A"], &["B"], None)];
        assert!(compute_statistics(&history).is_empty());
    }
}
