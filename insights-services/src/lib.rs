//! Business logic services for Industry Insights
//!
//! This crate provides the service layer that turns an industry name into
//! scraped news records and, from those, a generated insights report.

pub mod insight_service;
pub mod news_aggregator;

pub use insight_service::{InsightOutcome, InsightReport, InsightService};
pub use news_aggregator::NewsAggregator;
pub use tokio_util::sync::CancellationToken;
