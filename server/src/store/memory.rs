use std::sync::RwLock;

use minefield_common::{models::ScoreRecord, protocol::LeaderboardQuery};
use tracing::debug;

use super::{ScoreStore, StoreError, select_top, sort_and_truncate, stamp};

/// Keeps scores for the lifetime of the process. Useful for tests and local
/// play without persistence.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<ScoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn insert(&self, record: ScoreRecord) -> Result<ScoreRecord, StoreError> {
        let record = stamp(record);
        let mut entries = self.entries.write().expect("score store lock poisoned");
        entries.push(record.clone());
        sort_and_truncate(&mut entries);
        debug!("Stored score in memory, {} entries total", entries.len());
        Ok(record)
    }

    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<ScoreRecord>, StoreError> {
        let entries = self.entries.read().expect("score store lock poisoned");
        Ok(select_top(&entries, query))
    }
}
