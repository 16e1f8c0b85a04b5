//! News ingestion for the insights pipeline
//!
//! This crate provides:
//! - Google News RSS search: turns an industry name into feed candidates
//! - Article extraction: downloads a candidate's page and keeps the article text
//! - The `FeedSource` / `ArticleSource` seams the aggregator is written against

pub mod article;
pub mod error;
pub mod google_news;
pub mod source;

pub use article::{extract_article_text, ArticleExtractor};
pub use error::NewsError;
pub use google_news::{build_industry_query, parse_feed, GoogleNewsClient};
pub use source::{ArticleSource, FeedSource};
