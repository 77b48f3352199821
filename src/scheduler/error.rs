//! Error types for the scheduler module

use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Trigger configuration error
    #[error("Trigger config error in '{field}': {reason}")]
    TriggerConfig { field: String, reason: String },
}

impl SchedulerError {
    /// Create a trigger config error
    pub fn trigger_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TriggerConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Configuration errors require operator action, not retries
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
