//! Google News RSS client for industry news
//!
//! Builds a search query from the industry name, fetches the Google News RSS
//! search feed once and returns its entries in feed order.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use insights_core::{NewsCandidate, PipelineConfig};

use crate::error::NewsError;
use crate::source::FeedSource;

/// Google News RSS client
pub struct GoogleNewsClient {
    client: Client,
    base_url: String,
    query_hints: String,
    /// `hl`, `gl` and `ceid` parameters, appended when set
    locale: Option<(String, String, String)>,
}

impl GoogleNewsClient {
    /// Create a new Google News client from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(config.feed_timeout())
            .user_agent("Mozilla/5.0 (compatible; IndustryInsights/1.0)")
            .build()
            .map_err(|e| NewsError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.feed_endpoint.clone(),
            query_hints: config.query_hints.clone(),
            locale: None,
        })
    }

    /// Pin the feed language and region, e.g. `("en-US", "US", "US:en")`
    pub fn with_locale(mut self, hl: &str, gl: &str, ceid: &str) -> Self {
        self.locale = Some((hl.to_string(), gl.to_string(), ceid.to_string()));
        self
    }

    /// Full feed URL for an industry
    pub fn feed_url(&self, industry: &str) -> String {
        let query = build_industry_query(industry, &self.query_hints);
        let mut url = format!("{}?q={}", self.base_url, urlencoding::encode(&query));

        if let Some((hl, gl, ceid)) = &self.locale {
            url.push_str(&format!(
                "&hl={}&gl={}&ceid={}",
                urlencoding::encode(hl),
                urlencoding::encode(gl),
                urlencoding::encode(ceid)
            ));
        }

        url
    }

    /// Search Google News for an industry
    #[instrument(skip(self))]
    pub async fn search_industry_news(
        &self,
        industry: &str,
    ) -> Result<Vec<NewsCandidate>, NewsError> {
        let url = self.feed_url(industry);

        info!("Fetching Google News RSS: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NewsError::ApiError {
                status: response.status().as_u16(),
                message: format!("Google News returned status {}", response.status()),
            });
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| NewsError::RequestFailed(e.to_string()))?;

        let candidates = parse_feed(&content)?;

        info!(
            "Google News returned {} entries for '{}'",
            candidates.len(),
            industry
        );

        Ok(candidates)
    }
}

#[async_trait]
impl FeedSource for GoogleNewsClient {
    async fn resolve(&self, industry: &str) -> Result<Vec<NewsCandidate>, NewsError> {
        self.search_industry_news(industry).await
    }
}

/// Build the search query: `"<industry> <hint terms>"`
pub fn build_industry_query(industry: &str, hints: &str) -> String {
    let industry = industry.trim();
    let hints = hints.trim();

    if hints.is_empty() {
        industry.to_string()
    } else {
        format!("{} {}", industry, hints)
    }
}

/// Parse a syndication document, trying RSS first and then Atom
pub fn parse_feed(content: &[u8]) -> Result<Vec<NewsCandidate>, NewsError> {
    if let Ok(channel) = rss::Channel::read_from(content) {
        return Ok(parse_rss_channel(&channel));
    }

    if let Ok(feed) = atom_syndication::Feed::read_from(content) {
        return Ok(parse_atom_feed(&feed));
    }

    Err(NewsError::ParseError(
        "Document is neither RSS nor Atom".to_string(),
    ))
}

/// Convert RSS items into candidates, skipping items without title or link
fn parse_rss_channel(channel: &rss::Channel) -> Vec<NewsCandidate> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim();
            let link = item.link()?.trim();

            if title.is_empty() || link.is_empty() {
                debug!("Skipping RSS item without title or link");
                return None;
            }

            Some(NewsCandidate::new(
                title,
                link,
                item.pub_date().unwrap_or_default().trim(),
            ))
        })
        .collect()
}

/// Convert Atom entries into candidates
///
/// Prefers the `alternate` link and the `published` date, falling back to
/// the first link and the `updated` date.
fn parse_atom_feed(feed: &atom_syndication::Feed) -> Vec<NewsCandidate> {
    feed.entries()
        .iter()
        .filter_map(|entry| {
            let title = entry.title().to_string().trim().to_string();
            let link = entry
                .links()
                .iter()
                .find(|l| l.rel() == "alternate")
                .or_else(|| entry.links().first())
                .map(|l| l.href().trim().to_string())
                .unwrap_or_default();

            if title.is_empty() || link.is_empty() {
                return None;
            }

            let published = entry
                .published()
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| entry.updated().to_rfc3339());

            Some(NewsCandidate::new(title, link, published))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"Fintech technology" - Google News</title>
    <link>https://news.google.com</link>
    <description>Google News</description>
    <item>
      <title>Banks race to adopt AI - Reuters</title>
      <link>https://news.google.com/articles/one</link>
      <pubDate>Mon, 06 Jan 2025 08:00:00 GMT</pubDate>
    </item>
    <item>
      <title>No link here</title>
      <pubDate>Mon, 06 Jan 2025 07:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Payments startups raise record rounds - TechCrunch</title>
      <link>https://news.google.com/articles/two</link>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Industry feed</title>
  <id>urn:uuid:feed</id>
  <updated>2025-01-06T10:00:00Z</updated>
  <entry>
    <title>Chipmakers expand capacity</title>
    <id>urn:uuid:1</id>
    <link rel="alternate" href="https://example.com/chips"/>
    <updated>2025-01-06T09:00:00Z</updated>
    <published>2025-01-05T09:00:00Z</published>
  </entry>
  <entry>
    <title>Foundry pricing update</title>
    <id>urn:uuid:2</id>
    <link href="https://example.com/foundry"/>
    <updated>2025-01-04T09:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_build_industry_query() {
        let query = build_industry_query("  Fintech ", "technology OR innovation OR AI news");
        assert_eq!(query, "Fintech technology OR innovation OR AI news");
        assert_eq!(build_industry_query("Fintech", ""), "Fintech");
    }

    #[test]
    fn test_feed_url_encodes_query() {
        let client = GoogleNewsClient::new(&PipelineConfig::default()).unwrap();
        let url = client.feed_url("Clean Energy");
        assert_eq!(
            url,
            "https://news.google.com/rss/search?q=Clean%20Energy%20technology%20OR%20innovation%20OR%20AI%20news"
        );
    }

    #[test]
    fn test_feed_url_with_locale() {
        let client = GoogleNewsClient::new(&PipelineConfig::default())
            .unwrap()
            .with_locale("en-US", "US", "US:en");
        let url = client.feed_url("AI");
        assert!(url.ends_with("&hl=en-US&gl=US&ceid=US%3Aen"));
    }

    #[test]
    fn test_parse_rss_preserves_order_and_skips_incomplete() {
        let candidates = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Banks race to adopt AI - Reuters");
        assert_eq!(candidates[0].link, "https://news.google.com/articles/one");
        assert_eq!(candidates[0].published, "Mon, 06 Jan 2025 08:00:00 GMT");
        assert_eq!(candidates[1].link, "https://news.google.com/articles/two");
        assert_eq!(candidates[1].published, "");
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title><link>l</link><description>d</description></channel></rss>"#;
        assert!(parse_feed(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_atom_fallback() {
        let candidates = parse_feed(ATOM_SAMPLE.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].link, "https://example.com/chips");
        assert!(candidates[0].published.starts_with("2025-01-05T09:00:00"));
        assert!(candidates[1].published.starts_with("2025-01-04T09:00:00"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_feed(b"<html><body>not a feed</body></html>"),
            Err(NewsError::ParseError(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_search() {
        let client = GoogleNewsClient::new(&PipelineConfig::default()).unwrap();
        let candidates = client.search_industry_news("Fintech").await.unwrap();
        assert!(!candidates.is_empty());
    }
}
