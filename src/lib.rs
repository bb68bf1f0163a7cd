pub mod api;
pub mod balancing;
pub mod cli;
pub mod config;
pub mod domain;
pub mod fines;
pub mod history;
pub mod http;
pub mod ledger;
pub mod rate_limiter;
pub mod rating;
pub mod report;
pub mod services;
pub mod storage;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::Path;

use crate::api::{RosterFile, SpondClient};
use crate::balancing::Strategy;
use crate::cli::{Command, FineCommand, FineTypeCommand, MatchCommand};
use crate::config::settings::AppConfig;
use crate::services::{Club, ServerService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_sync(snapshot: Option<&Path>) -> Result<()> {
    let config = AppConfig::from_env();
    let club = Club::open(config.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        match snapshot {
            Some(path) => {
                let mut source = RosterFile::new(path);
                club.sync(&mut source).await
            }
            None => {
                let mut source = SpondClient::new(config.source)?;
                club.sync(&mut source).await
            }
        }
    })?;

    print!("{}", report::render_sync_report(&report));
    Ok(())
}

pub fn handle_stats() -> Result<()> {
    let mut club = Club::open(AppConfig::from_env());
    let wins = club.history().team_win_counts();
    print!("{}", report::render_statistics(club.statistics(), wins));
    Ok(())
}

pub fn handle_teams(players: &[String], strategy: Strategy, seed: Option<u64>) -> Result<()> {
    let mut club = Club::open(AppConfig::from_env());
    let partition = match seed {
        Some(seed) => club.generate_teams(players, strategy, &mut ChaCha8Rng::seed_from_u64(seed))?,
        None => club.generate_teams(players, strategy, &mut rand::thread_rng())?,
    };
    print!("{}", report::render_partition(&partition));
    Ok(())
}

pub fn handle_matches(command: &MatchCommand) -> Result<()> {
    let mut club = Club::open(AppConfig::from_env());

    match command {
        MatchCommand::List { status } => {
            let matches = club.history().list(status.map(Into::into));
            print!("{}", report::render_matches(&matches));
        }
        MatchCommand::Create { team1, team2 } => {
            let match_id = club.create_match(team1.clone(), team2.clone())?;
            println!("Created pending match {match_id}");
        }
        MatchCommand::Log { team1, team2, winner } => {
            let outcome = club.log_match(team1.clone(), team2.clone(), *winner)?;
            print!("{}", report::render_outcome(&outcome));
        }
        MatchCommand::Complete { match_id, winner } => match club.complete_match(match_id, *winner)? {
            Some(outcome) => print!("{}", report::render_outcome(&outcome)),
            None => bail!("Match {match_id} not found or already completed"),
        },
        MatchCommand::Delete { match_id } => {
            if !club.delete_match(match_id)? {
                bail!("Match {match_id} not found or not pending");
            }
            println!("Deleted match {match_id}");
        }
    }
    Ok(())
}

pub fn handle_fines(command: &FineCommand) -> Result<()> {
    let club = Club::open(AppConfig::from_env());
    let ledger = club.ledger();

    match command {
        FineCommand::Summary => print!("{}", report::render_summary(&ledger.summary())),
        FineCommand::Players => print!("{}", report::render_player_fines(&ledger.by_player_processed())),
        FineCommand::Pay { key } => expect_found(ledger.mark_paid(key)?, key, "marked paid")?,
        FineCommand::Unpay { key } => expect_found(ledger.set_unpaid(key)?, key, "marked unpaid")?,
        FineCommand::PayAll { player } => {
            let changed = ledger.mark_all_paid(player.as_deref())?;
            println!("Marked {changed} fines paid");
        }
        FineCommand::UnpayAll { player } => {
            let changed = ledger.mark_all_unpaid(player.as_deref())?;
            println!("Marked {changed} fines unpaid");
        }
        FineCommand::Amount { key, amount } => {
            expect_found(ledger.set_amount(key, *amount)?, key, "updated")?
        }
        FineCommand::Remove { key } => expect_found(ledger.remove(key)?, key, "removed")?,
        FineCommand::Issue { type_id, player } => match club.issue_manual_fine(type_id, player)? {
            Some((key, record)) => println!("Issued {} kr fine {key}", record.fine_amount),
            None => bail!("Unknown fine type {type_id}"),
        },
    }
    Ok(())
}

pub fn handle_fine_types(command: &FineTypeCommand) -> Result<()> {
    let club = Club::open(AppConfig::from_env());
    let catalog = club.catalog();

    match command {
        FineTypeCommand::List => print!("{}", report::render_fine_types(&catalog.list())),
        FineTypeCommand::Add { name, amount, description } => match catalog.add(name, *amount, description)? {
            Some(fine_type) => println!("Added fine type {}", fine_type.id),
            None => bail!("A fine type named {name:?} already exists"),
        },
        FineTypeCommand::Remove { id } => {
            if !catalog.remove(id)? {
                bail!("Fine type {id} not found");
            }
            println!("Removed fine type {id}");
        }
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn expect_found(found: bool, key: &str, action: &str) -> Result<()> {
    if !found {
        bail!("Fine {key} not found");
    }
    println!("Fine {key} {action}");
    Ok(())
}
