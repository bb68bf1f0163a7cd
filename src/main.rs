use anyhow::Result;

use squad_ledger::cli::Command;
use squad_ledger::{
    handle_completions, handle_fine_types, handle_fines, handle_matches, handle_serve, handle_stats,
    handle_sync, handle_teams, interpret,
};

fn main() {
    load_env_file();
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn load_env_file() {
    // A missing .env is normal; the environment alone is enough.
    let _ = dotenvy::dotenv();
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Sync { snapshot } => handle_sync(snapshot.as_deref()),
        Command::Stats => handle_stats(),
        Command::Teams { players, strategy, seed } => handle_teams(players, *strategy, *seed),
        Command::Matches { command } => handle_matches(command),
        Command::Fines { command } => handle_fines(command),
        Command::FineTypes { command } => handle_fine_types(command),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
