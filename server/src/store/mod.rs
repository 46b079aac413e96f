mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::{env, sync::Arc};

use chrono::Utc;
use minefield_common::{
    models::ScoreRecord,
    protocol::{LeaderboardQuery, SortOrder},
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Hard cap on entries kept per backend; inserting past it drops the lowest
/// scores.
pub const MAX_STORED: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("score storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The leaderboard storage capability: insert a record, read the top of the
/// board. Which backend holds the records is a deployment decision, invisible
/// to callers.
pub trait ScoreStore: Send + Sync {
    /// Persist a record, stamping its id and timestamp. Returns the stored
    /// form.
    fn insert(&self, record: ScoreRecord) -> Result<ScoreRecord, StoreError>;

    /// The best records matching `query`, best first.
    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<ScoreRecord>, StoreError>;
}

pub type SharedStore = Arc<dyn ScoreStore>;

/// Pick the backend from `LEADERBOARD_BACKEND` (`file`, the default, or
/// `memory`).
pub fn create_store() -> Result<SharedStore, StoreError> {
    let backend = env::var("LEADERBOARD_BACKEND").unwrap_or_else(|_| "file".to_string());

    if backend == "memory" {
        info!("Using in-memory score store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = env::var("SCORES_FILE").unwrap_or_else(|_| "./scores.json".to_string());
    info!("Using file score store at {}", path);
    Ok(Arc::new(FileStore::open(path)?))
}

fn stamp(mut record: ScoreRecord) -> ScoreRecord {
    record.id = Some(Uuid::new_v4());
    record.timestamp = Some(Utc::now());
    record
}

/// Keep only the `MAX_STORED` best entries, by score.
fn sort_and_truncate(entries: &mut Vec<ScoreRecord>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_STORED);
}

fn select_top(entries: &[ScoreRecord], query: &LeaderboardQuery) -> Vec<ScoreRecord> {
    let mut selected: Vec<ScoreRecord> = entries
        .iter()
        .filter(|record| {
            query
                .difficulty
                .is_none_or(|difficulty| record.difficulty == difficulty)
        })
        .cloned()
        .collect();

    match query.order {
        SortOrder::Score => selected.sort_by(|a, b| b.score.cmp(&a.score)),
        SortOrder::Time => selected.sort_by(|a, b| a.elapsed_seconds.cmp(&b.elapsed_seconds)),
    }

    selected.truncate(query.limit.min(MAX_STORED));
    selected
}
