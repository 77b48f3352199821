//! Per-user solve progress against daily problem sets
//!
//! The matching core is pure: build a solved-key set from a submission
//! history once, then answer each band with a set lookup. The ranged
//! variant reuses one solved-set across every date in the range, so a
//! month of progress costs a single pass over the submissions.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::archive::ArchiveClient;
use crate::error::Result;
use crate::models::{DailyProblemSet, DayProgress, Submission};
use crate::storage::{ProblemSetRepository, SharedProblemSetRepository};

/// Keys of every problem the submissions solved (verdict OK)
pub fn solved_keys(submissions: &[Submission]) -> HashSet<String> {
    submissions
        .iter()
        .filter(|s| s.verdict.is_some_and(|v| v.is_accepted()))
        .filter_map(|s| s.problem_key())
        .collect()
}

/// Solve state of one date's set against a precomputed solved-key set
pub fn match_day(solved: &HashSet<String>, set: &DailyProblemSet) -> DayProgress {
    DayProgress {
        date: set.date,
        easy: solved.contains(&set.easy.key()),
        medium: solved.contains(&set.medium.key()),
        hard: solved.contains(&set.hard.key()),
    }
}

/// Solve state for every set in a range, from one submission pass
pub fn match_range(submissions: &[Submission], sets: &[DailyProblemSet]) -> Vec<DayProgress> {
    let solved = solved_keys(submissions);
    sets.iter().map(|set| match_day(&solved, set)).collect()
}

/// Computes progress on demand from the archive and the set store
pub struct ProgressTracker {
    archive: Arc<ArchiveClient>,
    store: SharedProblemSetRepository,
    submission_page_size: u32,
}

impl ProgressTracker {
    pub fn new(
        archive: Arc<ArchiveClient>,
        store: SharedProblemSetRepository,
        submission_page_size: u32,
    ) -> Self {
        Self {
            archive,
            store,
            submission_page_size,
        }
    }

    /// Progress for one date; a date without a persisted set is all-false
    pub async fn for_date(
        &self,
        handle: &str,
        date: NaiveDate,
        force_refresh: bool,
    ) -> Result<DayProgress> {
        let Some(set) = self.store.get(date).await? else {
            return Ok(DayProgress::empty(date));
        };

        let submissions = self
            .archive
            .user_submissions(handle, 1, self.submission_page_size, force_refresh)
            .await?;
        let solved = solved_keys(&submissions);

        Ok(match_day(&solved, &set))
    }

    /// Progress for every persisted set in the inclusive date range
    pub async fn for_range(
        &self,
        handle: &str,
        from: NaiveDate,
        to: NaiveDate,
        force_refresh: bool,
    ) -> Result<Vec<DayProgress>> {
        let sets = self.store.get_range(from, to).await?;
        if sets.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = self
            .archive
            .user_submissions(handle, 1, self.submission_page_size, force_refresh)
            .await?;

        Ok(match_range(&submissions, &sets))
    }

    /// Manual sync: purge the handle's cached archive data, then recompute
    /// with a forced refresh
    pub async fn sync(&self, handle: &str, date: NaiveDate) -> Result<DayProgress> {
        self.archive.invalidate_user(handle);
        self.for_date(handle, date, true).await
    }
}
