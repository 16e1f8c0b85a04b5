//! Seams between the aggregator and the network

use async_trait::async_trait;
use insights_core::{NewsCandidate, NewsRecord};

use crate::error::NewsError;

/// Something that turns an industry name into feed candidates
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Issue a single feed search for `industry` (already trimmed)
    async fn resolve(&self, industry: &str) -> Result<Vec<NewsCandidate>, NewsError>;
}

/// Something that turns a candidate into a record with article text
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn extract(&self, candidate: &NewsCandidate) -> Result<NewsRecord, NewsError>;
}
