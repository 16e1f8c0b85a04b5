//! Error types for generative model calls

use insights_core::InsightsError;
use thiserror::Error;

/// Errors returned by an insight generator
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed or timed out
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider returned an error response
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    /// Provider answered without any text (blocked or truncated)
    #[error("Model returned no text: {0}")]
    EmptyResponse(String),

    /// Failed to parse the provider response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing or invalid credentials
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<GenerationError> for InsightsError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Config(msg) => InsightsError::Config(msg),
            other => InsightsError::Generation(other.to_string()),
        }
    }
}
