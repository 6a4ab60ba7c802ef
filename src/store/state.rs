use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::CURRENT_SCHEMA_VERSION;
use crate::item::{name_key, normalize_name, Item, ItemError, ItemId};

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: ItemId,
    pub name: String,
    pub votes: u64,
    pub created_at: DateTime<Utc>,
}

impl Record {
    #[must_use]
    pub fn to_item(&self, voted_by_me: bool) -> Item {
        Item {
            id: self.id,
            name: self.name.clone(),
            votes: self.votes,
            voted_by_me,
        }
    }
}

/// One voter's vote on one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub item_id: ItemId,
    pub voter: String,
}

/// Everything the store owns; also the on-disk snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Schema version for future migrations
    pub schema_version: u32,

    /// When the state was last modified
    pub updated_at: String,

    pub next_id: ItemId,

    /// Local date of the last daily reset
    #[serde(default)]
    pub last_reset: Option<NaiveDate>,

    #[serde(default)]
    pub items: Vec<Record>,

    #[serde(default)]
    pub ballots: HashSet<Ballot>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            updated_at: Utc::now().to_rfc3339(),
            next_id: 1,
            last_reset: None,
            items: Vec::new(),
            ballots: HashSet::new(),
        }
    }

    /// Items ordered by votes descending, then creation time, then id.
    #[must_use]
    pub fn list(&self, voter: &str) -> Vec<Item> {
        let mut records: Vec<&Record> = self.items.iter().collect();
        records.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        records
            .into_iter()
            .map(|r| r.to_item(self.has_voted(r.id, voter)))
            .collect()
    }

    pub fn create(&mut self, raw_name: &str, now: DateTime<Utc>) -> Result<Record, ItemError> {
        let name = normalize_name(raw_name)?;
        let key = name_key(&name);
        if self.items.iter().any(|r| name_key(&r.name) == key) {
            return Err(ItemError::DuplicateName);
        }
        let record = Record {
            id: self.next_id,
            name,
            votes: 0,
            created_at: now,
        };
        self.next_id = self.next_id.saturating_add(1);
        self.items.push(record.clone());
        self.touch(now);
        Ok(record)
    }

    pub fn vote(
        &mut self,
        id: ItemId,
        voter: &str,
        now: DateTime<Utc>,
    ) -> Result<Record, ItemError> {
        let ballot = Ballot {
            item_id: id,
            voter: voter.to_string(),
        };
        let record = self
            .items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ItemError::NotFound(id))?;
        if self.ballots.contains(&ballot) {
            return Err(ItemError::AlreadyVoted(id));
        }
        record.votes = record.votes.saturating_add(1);
        let updated = record.clone();
        self.ballots.insert(ballot);
        self.touch(now);
        Ok(updated)
    }

    /// Drop every item and ballot, returning how many items were removed.
    ///
    /// Ids keep counting up so a client never confuses a new item with one
    /// it saw before the reset.
    pub fn reset(&mut self, date: NaiveDate, now: DateTime<Utc>) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.ballots.clear();
        self.last_reset = Some(date);
        self.touch(now);
        removed
    }

    #[must_use]
    pub fn has_voted(&self, id: ItemId, voter: &str) -> bool {
        self.ballots.contains(&Ballot {
            item_id: id,
            voter: voter.to_string(),
        })
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.to_rfc3339();
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
