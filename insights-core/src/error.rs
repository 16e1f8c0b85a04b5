//! Error types for the insights pipeline

use thiserror::Error;

/// Workspace-wide error type
///
/// Only generation and configuration failures are ever shown to a user.
/// Empty input and empty feeds are reported through sentinels instead.
#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InsightsError {
    pub fn generation(msg: impl Into<String>) -> Self {
        InsightsError::Generation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        InsightsError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        InsightsError::Internal(msg.into())
    }

    /// Whether the error should be rendered to the user as a failure
    pub fn is_user_visible(&self) -> bool {
        matches!(self, InsightsError::Generation(_) | InsightsError::Config(_))
    }
}

/// Result type alias for pipeline operations
pub type InsightsResult<T> = Result<T, InsightsError>;
