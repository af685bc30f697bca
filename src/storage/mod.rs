//! Storage module for persisting discovered URLs
//!
//! The flush loop hands batches of rows to a [`Storage`] sink. A batch mixes
//! unvisited frontier entries and visited scrape sources; the sink must
//! record the whole batch atomically so a crash mid-flush never leaves half
//! a cycle persisted.

mod schema;
mod sqlite;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;

use std::sync::{Arc, Mutex};
use thiserror::Error;

/// One row handed to the sink: a URL and whether it has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRow {
    pub url: String,
    pub visited: bool,
}

impl UrlRow {
    pub fn unvisited(url: String) -> Self {
        Self {
            url,
            visited: false,
        }
    }

    pub fn visited(url: String) -> Self {
        Self { url, visited: true }
    }
}

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// `persist_batch` must be atomic per call: either every row in the batch is
/// durably recorded or none is. An empty batch is a successful no-op.
pub trait Storage: Send {
    fn persist_batch(&mut self, rows: &[UrlRow]) -> StorageResult<()>;
}

/// Shared handle to a sink, lockable from the flush task.
pub type SharedStorage = Arc<Mutex<dyn Storage>>;
