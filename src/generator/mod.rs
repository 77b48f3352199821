//! Daily problem set generation
//!
//! The [`Generator`] owns the full lifecycle of one date's problem set:
//! it collapses concurrent requests for the same date into a single run,
//! pulls recent contests through the cached archive client, drives the
//! pure selector incrementally as contest data arrives, and persists the
//! completed set exactly once.
//!
//! Per-contest fetch failures are absorbed: a contest whose problem list
//! cannot be fetched is skipped and the scan continues. Only exhausting
//! the whole contest page without filling all three bands fails the
//! attempt, and nothing partial is ever written.

pub mod error;
pub mod singleflight;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::archive::ArchiveClient;
use crate::config::GeneratorConfig;
use crate::models::DailyProblemSet;
use crate::selector::{select, Selection};
use crate::storage::{ProblemSetRepository, SharedProblemSetRepository, StorageError};

pub use error::GenerateError;
pub use singleflight::SingleFlight;

/// Outcome shared by every caller attached to one generation attempt
pub type GenerateResult = Result<DailyProblemSet, Arc<GenerateError>>;

/// Today's date in the fixed reference time zone (UTC)
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Coordinates daily problem set generation
pub struct Generator {
    archive: Arc<ArchiveClient>,
    store: SharedProblemSetRepository,
    config: GeneratorConfig,
    inflight: SingleFlight<NaiveDate, GenerateResult>,
}

impl Generator {
    pub fn new(
        config: GeneratorConfig,
        archive: Arc<ArchiveClient>,
        store: SharedProblemSetRepository,
    ) -> Self {
        Self {
            archive,
            store,
            config,
            inflight: SingleFlight::new(),
        }
    }

    /// Get or create the problem set for `date` (default: today, UTC).
    ///
    /// Concurrent calls for the same date collapse into one unit of work;
    /// every caller receives the identical set or the identical failure.
    pub async fn generate(&self, date: Option<NaiveDate>) -> GenerateResult {
        let target = date.unwrap_or_else(today_utc);

        self.inflight
            .run(target, || async move {
                self.generate_for(target).await.map_err(Arc::new)
            })
            .await
    }

    /// Number of dates with a generation currently in flight
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    async fn generate_for(&self, date: NaiveDate) -> Result<DailyProblemSet, GenerateError> {
        if let Some(existing) = self.store.get(date).await? {
            tracing::debug!(date = %date, "Problem set already persisted");
            return Ok(existing);
        }

        tracing::info!(date = %date, window = self.config.contest_window, "Generating daily problem set");

        let contests = self
            .archive
            .recent_contests(self.config.contest_window, self.config.recency_days)
            .await?;
        if contests.is_empty() {
            return Err(GenerateError::NoContests);
        }

        // Recomputed fresh each run; staleness here would allow repeats
        let used_keys = self.store.all_used_keys().await?;

        let mut problems_by_contest = HashMap::new();
        let mut selection = Selection::default();

        for contest in &contests {
            match self.archive.contest_problems(contest.id).await {
                Ok(problems) if !problems.is_empty() => {
                    problems_by_contest.insert(contest.id, problems);
                }
                Ok(_) => {
                    tracing::debug!(contest_id = contest.id, "Contest has no problem data");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        contest_id = contest.id,
                        error = %e,
                        "Failed to fetch contest problems, skipping"
                    );
                    continue;
                }
            }

            selection = select(&contests, &problems_by_contest, &used_keys);
            if selection.is_complete() {
                break;
            }
        }

        let missing = selection.missing_bands();
        let Some(set) = selection.into_problem_set(date) else {
            tracing::warn!(
                date = %date,
                missing = ?missing,
                window = self.config.contest_window,
                "Could not fill all bands from the contest page"
            );
            return Err(GenerateError::ExhaustedPool {
                window: self.config.contest_window,
            });
        };

        match self.store.create(&set).await {
            Ok(created) => {
                tracing::info!(
                    date = %date,
                    easy = %created.easy.key(),
                    medium = %created.medium.key(),
                    hard = %created.hard.key(),
                    "Daily problem set generated"
                );
                Ok(created)
            }
            Err(StorageError::Conflict { .. }) => {
                // Another writer won the race; their set is the set
                tracing::info!(date = %date, "Set persisted concurrently, reusing stored set");
                self.store
                    .get(date)
                    .await?
                    .ok_or(GenerateError::Storage(StorageError::Conflict { date }))
            }
            Err(e) => Err(e.into()),
        }
    }
}
