//! Terminal rendering for CLI commands.

use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::balancing::{PlayerRate, TeamPartition};
use crate::domain::{ManualFineType, MatchStatus, TrainingMatch};
use crate::history::TeamWinCounts;
use crate::ledger::{LedgerSummary, PlayerFines};
use crate::rating::PlayerStatistics;
use crate::services::{MatchOutcome, SyncReport};

pub fn render_statistics(stats: &PlayerStatistics, wins: TeamWinCounts) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Player statistics".bold());

    if stats.is_empty() {
        let _ = writeln!(
            out,
            "  No completed matches yet, everyone rates {:.0}%",
            stats.default_win_rate() * 100.0
        );
    }
    for (rank, (name, stat)) in stats.ranked().into_iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {:>5.1}%  {}W {}L ({} played)",
            rank + 1,
            name,
            stat.win_rate * 100.0,
            stat.wins.to_string().green(),
            stat.losses.to_string().red(),
            stat.matches
        );
    }
    let _ = writeln!(out, "Team 1 wins: {}  Team 2 wins: {}", wins.team1, wins.team2);
    out
}

pub fn render_partition(partition: &TeamPartition) -> String {
    let balance = &partition.balance;
    let mut out = String::new();

    render_team(&mut out, "Team 1", balance.team1_strength, &balance.team1_players_stats);
    render_team(&mut out, "Team 2", balance.team2_strength, &balance.team2_players_stats);
    if !partition.remaining.is_empty() {
        let _ = writeln!(out, "{} {}", "Reserve:".yellow(), partition.remaining.join(", "));
    }

    let percentage = format!("{:.1}%", balance.balance_percentage);
    let percentage = if balance.strength_difference < 0.05 {
        percentage.green()
    } else if balance.strength_difference < 0.15 {
        percentage.yellow()
    } else {
        percentage.red()
    };
    let _ = writeln!(
        out,
        "Balance {} (difference {:.3}, {} strategy)",
        percentage,
        balance.strength_difference,
        partition.strategy.as_str()
    );
    out
}

fn render_team(out: &mut String, label: &str, strength: f64, players: &[PlayerRate]) {
    let _ = writeln!(out, "{} (strength {:.3})", label.bold(), strength);
    for player in players {
        let _ = writeln!(out, "  - {:<24} {:>5.1}%", player.name, player.win_rate * 100.0);
    }
}

pub fn render_matches(matches: &[TrainingMatch]) -> String {
    if matches.is_empty() {
        return "No training matches recorded\n".to_string();
    }

    let mut out = String::new();
    for m in matches {
        let status = match m.status {
            MatchStatus::Pending => m.status.as_str().yellow(),
            MatchStatus::Completed => m.status.as_str().green(),
        };
        let result = m
            .winner()
            .map(|side| format!(", {side} won"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{} [{}{}] {}",
            m.match_id.bold(),
            status,
            result,
            m.date.format("%Y-%m-%d %H:%M")
        );
        let _ = writeln!(out, "  Team 1: {}", m.team1.join(", "));
        let _ = writeln!(out, "  Team 2: {}", m.team2.join(", "));
    }
    out
}

pub fn render_outcome(outcome: &MatchOutcome) -> String {
    format!(
        "Match {} recorded, {} won, {} training-loss fines added\n",
        outcome.match_id.bold(),
        outcome.winning_team,
        outcome.fines_added
    )
}

pub fn render_summary(summary: &LedgerSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Fines summary".bold());
    let _ = writeln!(
        out,
        "  {} fines, {} kr total, {} paid, {} kr outstanding",
        summary.total_fines,
        summary.total_amount,
        summary.paid_fines,
        summary.unpaid_amount.to_string().red()
    );
    for (name, totals) in &summary.player_totals {
        let _ = writeln!(
            out,
            "  {:<24} {:>3} fines {:>6} kr  paid {:>6} kr  unpaid {:>6} kr",
            name, totals.total_fines, totals.total_amount, totals.paid_amount, totals.unpaid_amount
        );
    }
    out
}

pub fn render_player_fines(players: &BTreeMap<String, PlayerFines>) -> String {
    if players.is_empty() {
        return "No fines recorded\n".to_string();
    }

    let mut out = String::new();
    for (name, fines) in players {
        let _ = writeln!(
            out,
            "{}: {} kr ({} kr unpaid) | no-shows {} | late {} | training losses {} | manual {}",
            name.bold(),
            fines.total_fine,
            fines.unpaid_amount,
            fines.no_show_count,
            fines.late_response_count,
            fines.training_loss_count,
            fines.manual_count
        );
        for detail in &fines.events {
            let paid = if detail.paid { "paid".green() } else { "unpaid".red() };
            let _ = writeln!(
                out,
                "  {} {:<32} {:<16} {:>5} kr {}  [{}]",
                detail.event_date.format("%Y-%m-%d"),
                detail.event_name,
                detail.fine_subtype.as_deref().unwrap_or(detail.fine_type.as_str()),
                detail.fine_amount,
                paid,
                detail.key
            );
        }
    }
    out
}

pub fn render_fine_types(types: &[ManualFineType]) -> String {
    if types.is_empty() {
        return "No fine types defined\n".to_string();
    }

    let mut out = String::new();
    for fine_type in types {
        let _ = writeln!(
            out,
            "{:<20} {:<24} {:>5} kr  {}",
            fine_type.id.bold(),
            fine_type.name,
            fine_type.amount,
            fine_type.description
        );
    }
    out
}

pub fn render_sync_report(report: &SyncReport) -> String {
    format!(
        "{} {} events and {} members, {} new fines\n",
        "Synced".green(),
        report.events,
        report.members,
        report.fines_added
    )
}
