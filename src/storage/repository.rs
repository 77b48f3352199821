//! Repository abstraction over the daily problem set store
//!
//! The trait decouples the generation and progress logic from the storage
//! backend, so tests run against an in-memory implementation while
//! production uses SQLite. Both implementations are exercised by the same
//! test suite to keep their behavior aligned.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::models::{BandProblem, DailyProblemSet};
use crate::storage::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for daily problem set operations
#[async_trait]
pub trait ProblemSetRepository: Send + Sync {
    /// Get the set for a date, if one was persisted
    async fn get(&self, date: NaiveDate) -> Result<Option<DailyProblemSet>, StorageError>;

    /// Persist a new set; fails with [`StorageError::Conflict`] when the
    /// date already has one
    async fn create(&self, set: &DailyProblemSet) -> Result<DailyProblemSet, StorageError>;

    /// Sets in the inclusive date range, oldest first
    async fn get_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyProblemSet>, StorageError>;

    /// Most recent sets, newest first
    async fn get_recent(&self, limit: usize) -> Result<Vec<DailyProblemSet>, StorageError>;

    /// Every (contest, index) key appearing in any band of any stored set
    async fn all_used_keys(&self) -> Result<HashSet<String>, StorageError>;
}

/// Thread-safe shared repository handle
pub type SharedProblemSetRepository = Arc<dyn ProblemSetRepository>;

/// Create a shared SQLite repository
pub fn create_sqlite_repository(
    path: impl AsRef<Path>,
) -> Result<SharedProblemSetRepository, StorageError> {
    let repo = SqliteProblemSetRepository::new(path)?;
    Ok(Arc::new(repo))
}

/// Create a shared in-memory repository
pub fn create_memory_repository() -> SharedProblemSetRepository {
    Arc::new(MemoryProblemSetRepository::new())
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of [`ProblemSetRepository`]
///
/// Uses a `Mutex` to ensure thread-safety for the SQLite connection.
pub struct SqliteProblemSetRepository {
    conn: Mutex<Connection>,
}

impl SqliteProblemSetRepository {
    /// Open (or create) the database at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite repository initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;
        Ok(repo)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS daily_problem_sets (
                    date TEXT PRIMARY KEY,
                    easy_contest_id INTEGER NOT NULL,
                    easy_index TEXT NOT NULL,
                    easy_rating INTEGER NOT NULL,
                    medium_contest_id INTEGER NOT NULL,
                    medium_index TEXT NOT NULL,
                    medium_rating INTEGER NOT NULL,
                    hard_contest_id INTEGER NOT NULL,
                    hard_index TEXT NOT NULL,
                    hard_rating INTEGER NOT NULL,
                    created_at TEXT NOT NULL
                );
                "#,
        )?;

        Ok(())
    }

    fn row_to_set(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, DailyProblemSet)> {
        let date_str: String = row.get(0)?;
        let set = DailyProblemSet {
            // Re-parsed by the caller; placeholder keeps this helper infallible
            date: NaiveDate::MIN,
            easy: BandProblem {
                contest_id: row.get(1)?,
                index: row.get(2)?,
                rating: row.get(3)?,
            },
            medium: BandProblem {
                contest_id: row.get(4)?,
                index: row.get(5)?,
                rating: row.get(6)?,
            },
            hard: BandProblem {
                contest_id: row.get(7)?,
                index: row.get(8)?,
                rating: row.get(9)?,
            },
        };
        Ok((date_str, set))
    }

    fn parse_date(raw: &str) -> Result<NaiveDate, StorageError> {
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|_| StorageError::InvalidDate(raw.to_string()))
    }

    fn finish_row(raw: (String, DailyProblemSet)) -> Result<DailyProblemSet, StorageError> {
        let (date_str, mut set) = raw;
        set.date = Self::parse_date(&date_str)?;
        Ok(set)
    }
}

const SELECT_COLUMNS: &str = "date, easy_contest_id, easy_index, easy_rating, \
     medium_contest_id, medium_index, medium_rating, \
     hard_contest_id, hard_index, hard_rating";

#[async_trait]
impl ProblemSetRepository for SqliteProblemSetRepository {
    async fn get(&self, date: NaiveDate) -> Result<Option<DailyProblemSet>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM daily_problem_sets WHERE date = ?1"),
                params![date.format(DATE_FORMAT).to_string()],
                Self::row_to_set,
            )
            .optional()?;

        raw.map(Self::finish_row).transpose()
    }

    async fn create(&self, set: &DailyProblemSet) -> Result<DailyProblemSet, StorageError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        let result = conn.execute(
            r#"
                INSERT INTO daily_problem_sets (
                    date,
                    easy_contest_id, easy_index, easy_rating,
                    medium_contest_id, medium_index, medium_rating,
                    hard_contest_id, hard_index, hard_rating,
                    created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            params![
                set.date.format(DATE_FORMAT).to_string(),
                set.easy.contest_id,
                set.easy.index,
                set.easy.rating,
                set.medium.contest_id,
                set.medium.index,
                set.medium.rating,
                set.hard.contest_id,
                set.hard.index,
                set.hard.rating,
                now,
            ],
        );

        match result {
            Ok(_) => Ok(set.clone()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::Conflict { date: set.date })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyProblemSet>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM daily_problem_sets \
             WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC"
        ))?;

        let rows = stmt.query_map(
            params![
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string()
            ],
            Self::row_to_set,
        )?;

        rows.map(|row| Self::finish_row(row?)).collect()
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<DailyProblemSet>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM daily_problem_sets ORDER BY date DESC LIMIT ?1"
        ))?;

        let rows = stmt.query_map(params![limit as i64], Self::row_to_set)?;

        rows.map(|row| Self::finish_row(row?)).collect()
    }

    async fn all_used_keys(&self) -> Result<HashSet<String>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM daily_problem_sets"
        ))?;

        let rows = stmt.query_map([], Self::row_to_set)?;

        let mut keys = HashSet::new();
        for row in rows {
            let (_, set) = row?;
            for band in set.band_problems() {
                keys.insert(band.key());
            }
        }

        Ok(keys)
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// In-memory implementation of [`ProblemSetRepository`]
///
/// Backs tests and ephemeral runs; the `BTreeMap` keeps dates ordered so
/// range and recency queries match the SQLite ordering.
pub struct MemoryProblemSetRepository {
    sets: RwLock<BTreeMap<NaiveDate, DailyProblemSet>>,
}

impl MemoryProblemSetRepository {
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored sets
    pub fn len(&self) -> usize {
        self.sets.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.read().unwrap().is_empty()
    }
}

impl Default for MemoryProblemSetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProblemSetRepository for MemoryProblemSetRepository {
    async fn get(&self, date: NaiveDate) -> Result<Option<DailyProblemSet>, StorageError> {
        Ok(self.sets.read().unwrap().get(&date).cloned())
    }

    async fn create(&self, set: &DailyProblemSet) -> Result<DailyProblemSet, StorageError> {
        let mut sets = self.sets.write().unwrap();
        if sets.contains_key(&set.date) {
            return Err(StorageError::Conflict { date: set.date });
        }
        sets.insert(set.date, set.clone());
        Ok(set.clone())
    }

    async fn get_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyProblemSet>, StorageError> {
        Ok(self
            .sets
            .read()
            .unwrap()
            .range(from..=to)
            .map(|(_, set)| set.clone())
            .collect())
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<DailyProblemSet>, StorageError> {
        Ok(self
            .sets
            .read()
            .unwrap()
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn all_used_keys(&self) -> Result<HashSet<String>, StorageError> {
        Ok(self
            .sets
            .read()
            .unwrap()
            .values()
            .flat_map(|set| set.used_keys())
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
