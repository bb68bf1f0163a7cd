use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::balancing::Strategy;
use crate::domain::{MatchStatus, TeamSide};

#[derive(Parser, Debug)]
#[command(author, version, about = "Team balancing and fines ledger for a football club")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Fetch events and members and add fines for missed events
    Sync {
        /// Read the roster from a JSON snapshot instead of the Spond API
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Show player win rates from completed training matches
    Stats,
    /// Split players into two balanced teams
    Teams {
        /// Player names
        #[arg(required = true)]
        players: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = Strategy::Optimal)]
        strategy: Strategy,
        /// Seed for a reproducible split
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Training match history
    Matches {
        #[clap(subcommand)]
        command: MatchCommand,
    },
    /// Fine ledger
    Fines {
        #[clap(subcommand)]
        command: FineCommand,
    },
    /// Catalog of manual fine types
    FineTypes {
        #[clap(subcommand)]
        command: FineTypeCommand,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum MatchCommand {
    /// List matches
    List {
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Store confirmed teams as a pending match
    Create {
        /// Comma separated team 1 players
        #[arg(long, value_delimiter = ',', required = true)]
        team1: Vec<String>,
        /// Comma separated team 2 players
        #[arg(long, value_delimiter = ',', required = true)]
        team2: Vec<String>,
    },
    /// Store a match that has already been played
    Log {
        #[arg(long, value_delimiter = ',', required = true)]
        team1: Vec<String>,
        #[arg(long, value_delimiter = ',', required = true)]
        team2: Vec<String>,
        /// Winning team (1 or 2)
        #[arg(long, value_parser = parse_side)]
        winner: TeamSide,
    },
    /// Record the winner of a pending match
    Complete {
        match_id: String,
        /// Winning team (1 or 2)
        #[arg(long, value_parser = parse_side)]
        winner: TeamSide,
    },
    /// Delete a pending match
    Delete { match_id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FineCommand {
    /// Totals across all fines
    Summary,
    /// Fines grouped by player
    Players,
    /// Mark one fine paid
    Pay { key: String },
    /// Mark one fine unpaid
    Unpay { key: String },
    /// Mark all fines paid, optionally for one player
    PayAll {
        #[arg(long)]
        player: Option<String>,
    },
    /// Mark all fines unpaid, optionally for one player
    UnpayAll {
        #[arg(long)]
        player: Option<String>,
    },
    /// Change the amount of one fine
    Amount { key: String, amount: u32 },
    /// Delete one fine
    Remove { key: String },
    /// Give a player a fine from the catalog
    Issue { type_id: String, player: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum FineTypeCommand {
    List,
    Add {
        name: String,
        amount: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    Remove { id: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum StatusFilter {
    Pending,
    Completed,
}

impl From<StatusFilter> for MatchStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Pending => MatchStatus::Pending,
            StatusFilter::Completed => MatchStatus::Completed,
        }
    }
}

fn parse_side(raw: &str) -> Result<TeamSide, String> {
    let number: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected 1 or 2, got {raw:?}"))?;
    TeamSide::try_from(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_team_lists_and_winner() {
        let cli = Cli::try_parse_from([
            "squad_ledger", "matches", "log", "--team1", "Anna,Bo", "--team2", "Carl", "--winner", "2",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Matches {
                command: MatchCommand::Log {
                    team1: vec!["Anna".into(), "Bo".into()],
                    team2: vec!["Carl".into()],
                    winner: TeamSide::Two,
                }
            }
        );
    }

    #[test]
    fn rejects_unknown_winner() {
        let parsed = Cli::try_parse_from([
            "squad_ledger", "matches", "complete", "m1", "--winner", "3",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn teams_default_to_optimal() {
        let cli = Cli::try_parse_from(["squad_ledger", "teams", "A", "B", "C"]).unwrap();
        let Command::Teams { players, strategy, seed } = cli.command else {
            panic!("expected teams command");
        };
        assert_eq!(players.len(), 3);
        assert_eq!(strategy, Strategy::Optimal);
        assert!(seed.is_none());
    }
}
