//! ilgwa - Daily Problem Rotation Service
//!
//! A service that picks one easy, one medium, and one hard problem from a
//! remote contest archive every day, never repeating a problem across days,
//! and computes per-user solve progress from submission histories.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`archive`] - Rate-limited, TTL-caching archive client
//! - [`selector`] - Pure first-fit problem selection over rating bands
//! - [`generator`] - Single-flight daily set generation
//! - [`progress`] - Per-user solve progress matching
//! - [`scheduler`] - Startup and daily generation triggers
//! - [`storage`] - Problem set persistence (SQLite, in-memory)
//! - [`models`] - Core data structures and types
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ilgwa::archive::ArchiveClient;
//! use ilgwa::config::Config;
//! use ilgwa::generator::Generator;
//! use ilgwa::storage::create_memory_repository;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let archive = Arc::new(ArchiveClient::new(&config.archive)?);
//!     let generator = Generator::new(config.generator, archive, create_memory_repository());
//!     let set = generator.generate(None).await?;
//!     println!("today's easy problem: {}", set.easy.key());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod progress;
pub mod scheduler;
pub mod selector;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::archive::{ArchiveClient, ArchiveError};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::generator::{Generator, GenerateError};
    pub use crate::models::{Contest, DailyProblemSet, DayProgress, Problem, Submission};
    pub use crate::progress::ProgressTracker;
    pub use crate::scheduler::DailyTrigger;
    pub use crate::selector::{select, Band, Selection};
    pub use crate::storage::{ProblemSetRepository, SharedProblemSetRepository};
}

// Direct re-exports for convenience
pub use models::{Contest, DailyProblemSet, DayProgress, Problem, Submission};
