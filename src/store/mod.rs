//! Server-side item store.
//!
//! All mutations are serialized behind one async mutex. Each mutation is
//! applied to a copy of the state, persisted, and only then swapped in, so a
//! failed snapshot write leaves the live state untouched.

mod reset;
mod snapshot;
mod state;

pub use reset::DailyReset;
pub use snapshot::{read_snapshot, write_snapshot, CURRENT_SCHEMA_VERSION};
pub use state::{Ballot, Record, StoreState};

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::item::{Item, ItemError, ItemId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported snapshot schema version {found}")]
    UnsupportedSchema { found: u32 },
}

pub struct ItemStore {
    state: Mutex<StoreState>,
    snapshot_path: Option<PathBuf>,
    reset: Option<DailyReset>,
}

impl ItemStore {
    /// A store that lives only as long as the process.
    #[must_use]
    pub fn in_memory(reset: Option<DailyReset>) -> Self {
        Self {
            state: Mutex::new(StoreState::new()),
            snapshot_path: None,
            reset,
        }
    }

    /// Open a store backed by a JSON snapshot at `path`, loading it if present.
    pub async fn open(path: PathBuf, reset: Option<DailyReset>) -> Result<Self, StoreError> {
        let state = read_snapshot(&path).await?.map_or_else(
            || {
                debug!(path = %path.display(), "No snapshot found, starting empty");
                StoreState::new()
            },
            |state| {
                info!(
                    items = state.items.len(),
                    path = %path.display(),
                    "Loaded item snapshot"
                );
                state
            },
        );
        Ok(Self {
            state: Mutex::new(state),
            snapshot_path: Some(path),
            reset,
        })
    }

    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// All items ordered by votes (descending) then age, flagged for `voter`.
    pub async fn list(&self, voter: &str, now: DateTime<Utc>) -> Result<Vec<Item>, ItemError> {
        let mut state = self.state.lock().await;
        if let Some(date) = self.reset_due(&state, now) {
            let mut next = state.clone();
            apply_reset(&mut next, date, now);
            self.persist(&next).await?;
            *state = next;
        }
        Ok(state.list(voter))
    }

    pub async fn create(&self, name: &str, now: DateTime<Utc>) -> Result<Item, ItemError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        if let Some(date) = self.reset_due(&next, now) {
            apply_reset(&mut next, date, now);
        }
        let record = next.create(name, now)?;
        self.persist(&next).await?;
        *state = next;
        info!(id = record.id, name = %record.name, "Item created");
        Ok(record.to_item(false))
    }

    pub async fn vote(
        &self,
        id: ItemId,
        voter: &str,
        now: DateTime<Utc>,
    ) -> Result<Item, ItemError> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        if let Some(date) = self.reset_due(&next, now) {
            apply_reset(&mut next, date, now);
        }
        let record = next.vote(id, voter, now)?;
        self.persist(&next).await?;
        *state = next;
        debug!(id, votes = record.votes, "Vote recorded");
        Ok(record.to_item(true))
    }

    fn reset_due(&self, state: &StoreState, now: DateTime<Utc>) -> Option<NaiveDate> {
        self.reset.and_then(|reset| reset.due(now, state.last_reset))
    }

    async fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        match &self.snapshot_path {
            Some(path) => write_snapshot(path, state).await,
            None => Ok(()),
        }
    }
}

fn apply_reset(state: &mut StoreState, date: NaiveDate, now: DateTime<Utc>) {
    let removed = state.reset(date, now);
    info!(%date, removed, "Daily reset executed");
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
