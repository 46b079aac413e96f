use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use minefield_common::{models::ScoreRecord, protocol::LeaderboardQuery};
use tracing::debug;

use super::{ScoreStore, StoreError, select_top, sort_and_truncate, stamp};

/// Flat-file backend: one JSON array, loaded at startup and rewritten after
/// every insert. The file stays small because the entry count is capped.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Vec<ScoreRecord>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries: Vec<ScoreRecord> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };

        debug!("Loaded {} scores from {}", entries.len(), path.display());
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &[ScoreRecord]) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ScoreStore for FileStore {
    fn insert(&self, record: ScoreRecord) -> Result<ScoreRecord, StoreError> {
        let record = stamp(record);
        let mut entries = self.entries.write().expect("score store lock poisoned");
        entries.push(record.clone());
        sort_and_truncate(&mut entries);
        self.persist(&entries)?;
        debug!(
            "Stored score in {}, {} entries total",
            self.path.display(),
            entries.len()
        );
        Ok(record)
    }

    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<ScoreRecord>, StoreError> {
        let entries = self.entries.read().expect("score store lock poisoned");
        Ok(select_top(&entries, query))
    }
}
