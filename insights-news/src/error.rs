//! Error types for the news module

use thiserror::Error;

/// Errors that can occur while resolving feeds or extracting articles
///
/// None of these reach the user: a failed feed reads as "no updates" and a
/// failed article is dropped from the aggregation.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server returned a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to parse a feed document
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Page did not contain extractable article text
    #[error("Scrape failed: {0}")]
    ScrapeFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
