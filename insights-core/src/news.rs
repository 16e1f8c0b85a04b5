//! News data structures for the ingestion pipeline

use serde::{Deserialize, Serialize};

/// Default number of articles scraped per request
pub const DEFAULT_MAX_ARTICLES: usize = 10;

/// Default number of characters kept from each article
pub const DEFAULT_TRUNCATE_LENGTH: usize = 1500;

/// Marker appended to every truncated article body
pub const TRUNCATION_MARKER: &str = "...";

/// A feed entry that has not been scraped yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsCandidate {
    /// Entry title as published in the feed
    pub title: String,
    /// Link to the article page
    pub link: String,
    /// Raw publication timestamp from the feed (empty if missing)
    pub published: String,
}

impl NewsCandidate {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published: published.into(),
        }
    }

    /// Attach extracted article text, truncating it to `limit` characters
    pub fn into_record(self, article_text: &str, limit: usize) -> NewsRecord {
        NewsRecord {
            title: self.title,
            link: self.link,
            published: self.published,
            content: truncate_content(article_text, limit),
        }
    }
}

/// A candidate enriched with its extracted article text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    /// Entry title as published in the feed
    pub title: String,
    /// Link to the article page
    pub link: String,
    /// Raw publication timestamp from the feed
    pub published: String,
    /// Article text, at most the truncate length plus the marker
    pub content: String,
}

/// Input to the news aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Free-text industry name entered by the user
    pub industry: String,
    /// Maximum number of feed entries to scrape
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

fn default_max_articles() -> usize {
    DEFAULT_MAX_ARTICLES
}

impl AggregationRequest {
    pub fn new(industry: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            max_articles: DEFAULT_MAX_ARTICLES,
        }
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    /// The industry with surrounding whitespace removed, or `None` if blank
    pub fn trimmed_industry(&self) -> Option<&str> {
        let trimmed = self.industry.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Article cap, never below one
    pub fn article_limit(&self) -> usize {
        self.max_articles.max(1)
    }
}

/// Result of a news aggregation
///
/// `NoIndustry` and `NoUpdates` are expected conditions, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    /// Successfully scraped records, in feed order (may be empty)
    Records(Vec<NewsRecord>),
    /// The request carried no industry text
    NoIndustry,
    /// The feed returned no entries
    NoUpdates,
}

impl Aggregation {
    pub fn records(&self) -> Option<&[NewsRecord]> {
        match self {
            Aggregation::Records(records) => Some(records),
            _ => None,
        }
    }
}

/// Keep the first `limit` characters of `text` and append the marker
///
/// The marker is appended even when `text` is already shorter than `limit`.
pub fn truncate_content(text: &str, limit: usize) -> String {
    let mut content: String = text.chars().take(limit).collect();
    content.push_str(TRUNCATION_MARKER);
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_text() {
        let text = "a".repeat(2000);
        let content = truncate_content(&text, DEFAULT_TRUNCATE_LENGTH);
        assert_eq!(content.chars().count(), DEFAULT_TRUNCATE_LENGTH + 3);
        assert_eq!(&content[..DEFAULT_TRUNCATE_LENGTH], &text[..DEFAULT_TRUNCATE_LENGTH]);
        assert!(content.ends_with("..."));
    }

    #[test]
    fn test_truncate_short_text_still_gets_marker() {
        assert_eq!(truncate_content("Short body", 1500), "Short body...");
        assert_eq!(truncate_content("", 1500), "...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        let content = truncate_content(&text, 4);
        assert_eq!(content, "éééé...");
    }

    #[test]
    fn test_trimmed_industry() {
        assert_eq!(
            AggregationRequest::new("  Fintech \n").trimmed_industry(),
            Some("Fintech")
        );
        assert_eq!(AggregationRequest::new("   ").trimmed_industry(), None);
        assert_eq!(AggregationRequest::new("").trimmed_industry(), None);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: AggregationRequest = serde_json::from_str(r#"{"industry":"AI"}"#).unwrap();
        assert_eq!(request.max_articles, DEFAULT_MAX_ARTICLES);

        let request = AggregationRequest::new("AI").with_max_articles(0);
        assert_eq!(request.article_limit(), 1);
    }

    #[test]
    fn test_into_record() {
        let candidate = NewsCandidate::new("Title", "https://example.com/a", "Mon, 01 Jan 2024");
        let record = candidate.into_record("Body text", 4);
        assert_eq!(record.title, "Title");
        assert_eq!(record.link, "https://example.com/a");
        assert_eq!(record.published, "Mon, 01 Jan 2024");
        assert_eq!(record.content, "Body...");
    }
}
