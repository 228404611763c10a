//! Snapshot persistence.
//!
//! Snapshots live in a flat string key-value namespace that may be shared
//! with unrelated data:
//! - keys: `analysis:<id>`
//! - values: JSON-encoded snapshots tagged with `__kind`
//!
//! Backends:
//! - `MemoryStorage`: in-process, used by tests
//! - `SqliteStorage`: durable `kv` table in the platform data directory

pub mod memory;
pub mod snapshot;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use snapshot::{Snapshot, SnapshotStore};
pub use sqlite::SqliteStorage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: Box<StoreError>,
    },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage with browser `localStorage` semantics.
///
/// Implementations are single-writer; callers never issue overlapping
/// writes to the same key.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
