use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::domain::Roster;

/// Anything that can deliver one refresh worth of events and members.
pub trait RosterSource {
    fn fetch_roster(&mut self) -> impl Future<Output = Result<Roster>> + Send;
}

/// Roster snapshot stored as JSON in the source's wire format.
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Unlike the persisted collections, a snapshot that cannot be read is an error.
    pub fn read(&self) -> Result<Roster> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read roster snapshot {}", self.path.display()))?;
        let roster: Roster = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse roster snapshot {}", self.path.display()))?;

        info!(
            "Loaded {} events and {} members from {}",
            roster.events.len(),
            roster.members.len(),
            self.path.display()
        );
        Ok(roster)
    }
}

impl RosterSource for RosterFile {
    async fn fetch_roster(&mut self) -> Result<Roster> {
        self.read()
    }
}
