// Core data structures for the ilgwa service

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Format the canonical key for a (contest, index) pair.
///
/// This key identifies a problem across the used-problem registry, the
/// solved-set of the progress matcher, and the selector's exclusion set.
pub fn problem_key(contest_id: i64, index: &str) -> String {
    format!("{contest_id}-{index}")
}

/// Lifecycle phase of a contest as reported by the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestPhase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    Finished,
}

impl ContestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::Coding => "CODING",
            Self::PendingSystemTest => "PENDING_SYSTEM_TEST",
            Self::SystemTest => "SYSTEM_TEST",
            Self::Finished => "FINISHED",
        }
    }
}

/// A contest from the archive's contest listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub phase: ContestPhase,
    pub start_time_seconds: Option<i64>,
}

impl Contest {
    /// Whether the contest has finished and its problems are final
    pub fn is_finished(&self) -> bool {
        self.phase == ContestPhase::Finished
    }

    /// Contest start as a UTC timestamp, if the archive reported one
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time_seconds
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// A problem within a contest
///
/// `rating` is absent for very recent or unrated problems; such problems
/// are never eligible for selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub contest_id: Option<i64>,
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<u32>,
}

/// Submission verdict as reported by the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Ok,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    RuntimeError,
    CompilationError,
    Skipped,
    Testing,
    #[serde(other)]
    Other,
}

impl Verdict {
    /// Only an OK verdict counts as a solve
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// A single submission from a user's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    #[serde(default)]
    pub contest_id: Option<i64>,
    pub problem: Problem,
    #[serde(default)]
    pub verdict: Option<Verdict>,
}

impl Submission {
    /// Canonical key of the submitted problem, if the contest is known
    pub fn problem_key(&self) -> Option<String> {
        self.contest_id.map(|id| problem_key(id, &self.problem.index))
    }
}

/// One difficulty slot of a daily problem set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandProblem {
    pub contest_id: i64,
    pub index: String,
    pub rating: u32,
}

impl BandProblem {
    pub fn key(&self) -> String {
        problem_key(self.contest_id, &self.index)
    }
}

/// The persisted problem set for one calendar date
///
/// At most one set exists per date and it is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProblemSet {
    pub date: NaiveDate,
    pub easy: BandProblem,
    pub medium: BandProblem,
    pub hard: BandProblem,
}

impl DailyProblemSet {
    /// The three band slots in easy/medium/hard order
    pub fn band_problems(&self) -> [&BandProblem; 3] {
        [&self.easy, &self.medium, &self.hard]
    }

    /// Canonical keys of all three slots
    pub fn used_keys(&self) -> [String; 3] {
        [self.easy.key(), self.medium.key(), self.hard.key()]
    }
}

/// Per-user solve state for one date's problem set (never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub easy: bool,
    pub medium: bool,
    pub hard: bool,
}

impl DayProgress {
    /// A row for a date with no persisted set: nothing solvable
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            easy: false,
            medium: false,
            hard: false,
        }
    }

    pub fn solved_count(&self) -> u8 {
        self.easy as u8 + self.medium as u8 + self.hard as u8
    }
}
