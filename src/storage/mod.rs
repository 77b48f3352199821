//! Persistence for daily problem sets
//!
//! Storage is a thin repository layer: single-row reads and writes keyed by
//! calendar date, plus the derived used-problem registry. The only
//! transactional concern is the single-row create, which surfaces a typed
//! conflict when another writer (for example a second process instance)
//! persisted the same date first.

pub mod repository;

use chrono::NaiveDate;
use thiserror::Error;

pub use repository::{
    create_memory_repository, create_sqlite_repository, MemoryProblemSetRepository,
    ProblemSetRepository, SharedProblemSetRepository, SqliteProblemSetRepository,
};

/// Errors from the persistent store
#[derive(Error, Debug)]
pub enum StorageError {
    /// A set already exists for the date; callers re-read instead of failing
    #[error("A problem set already exists for {date}")]
    Conflict { date: NaiveDate },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored date column failed to parse
    #[error("Invalid stored date: {0}")]
    InvalidDate(String),

    /// Filesystem failure while opening the database
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Conflicts are resolved by re-reading, not by retrying the write
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Whether this is the duplicate-date conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
