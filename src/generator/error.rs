//! Error types for daily set generation

use thiserror::Error;

use crate::archive::error::ArchiveError;
use crate::storage::StorageError;

/// Errors that can end a generation attempt
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The archive returned no usable recent contests
    #[error("No recent contests available from the archive")]
    NoContests,

    /// The scanned contest page could not fill all three bands
    #[error("Problem pool exhausted within the last {window} contests")]
    ExhaustedPool { window: usize },

    /// Archive failure outside the per-contest skip path
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Store failure while reading or persisting
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl GenerateError {
    /// Whether a later attempt for the same date could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoContests => true,
            Self::ExhaustedPool { .. } => false,
            Self::Archive(e) => e.is_recoverable(),
            Self::Storage(e) => e.is_recoverable(),
        }
    }
}
