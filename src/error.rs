//! Unified error handling for the ilgwa crate
//!
//! This module provides a unified error type that consolidates all
//! domain-specific errors into a single [`Error`] enum, while keeping the
//! domain enums available where a narrower type is more useful.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use std::sync::Arc;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::archive::error::ArchiveError;
pub use crate::generator::error::GenerateError;
pub use crate::scheduler::error::SchedulerError;
pub use crate::storage::StorageError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (transport, timeout, remote API)
    Network,
    /// Storage and I/O errors
    Storage,
    /// Problem selection and generation errors
    Generation,
    /// Scheduler and timing errors
    Scheduler,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the ilgwa crate
///
/// Wraps all domain-specific errors, providing a single error type that
/// can cross module boundaries without losing detail.
#[derive(Error, Debug)]
pub enum Error {
    /// Archive client errors (transport, remote API, decode)
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Persistent store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Daily set generation errors, shared among all callers of one attempt
    #[error("Generation error: {0}")]
    Generation(#[from] Arc<GenerateError>),

    /// Scheduler and trigger errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is recoverable (the operation can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_recoverable(),
            Self::Storage(e) => e.is_recoverable(),
            Self::Generation(e) => e.is_recoverable(),
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Io(_) => true,
            Self::Json(_) => false,
            Self::Config(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Archive(_) => ErrorCategory::Network,
            Self::Storage(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Generation(e) => match e.as_ref() {
                GenerateError::Archive(_) => ErrorCategory::Network,
                GenerateError::Storage(_) => ErrorCategory::Storage,
                _ => ErrorCategory::Generation,
            },
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Json(_) => ErrorCategory::Other,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::Archive(ArchiveError::Timeout);
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = Error::config("bad value");
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_is_recoverable() {
        let timeout = Error::Archive(ArchiveError::Timeout);
        assert!(timeout.is_recoverable());

        let config = Error::config("bad value");
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_generation_error_category() {
        let exhausted = Arc::new(GenerateError::ExhaustedPool { window: 100 });
        let err: Error = exhausted.into();
        assert_eq!(err.category(), ErrorCategory::Generation);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_storage_conflict_conversion() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let conflict = StorageError::Conflict { date };
        let unified: Error = conflict.into();
        assert!(matches!(unified, Error::Storage(_)));
    }
}
