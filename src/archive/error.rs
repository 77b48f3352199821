//! Error types for the archive client

use thiserror::Error;

/// Errors that can occur talking to the contest archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Network-level failure (connection refused, reset, DNS)
    #[error("Transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Well-formed error response from the archive, with its message
    #[error("Archive rejected request: {0}")]
    Remote(String),

    /// Error status without a readable envelope
    #[error("Server error: {0}")]
    Server(u16),

    /// Response body did not match the expected shape
    #[error("Malformed archive response: {0}")]
    Decode(String),

    /// The configured minimum call interval is not representable
    #[error("Invalid minimum call interval")]
    InvalidInterval,

    /// HTTP client construction failed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ArchiveError {
    /// Transport-level failures are transient; archive rejections are not
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::Server(_))
    }
}
