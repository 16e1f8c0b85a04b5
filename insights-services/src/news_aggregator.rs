//! News Aggregator Service
//!
//! Resolves the feed for an industry, scrapes the first `max_articles`
//! entries and returns the records that could be extracted, in feed order.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use insights_core::{Aggregation, AggregationRequest, InsightsError, InsightsResult, PipelineConfig};
use insights_news::{ArticleExtractor, ArticleSource, FeedSource, GoogleNewsClient, NewsError};

/// Orchestrates the feed source and the article source
pub struct NewsAggregator {
    feed: Arc<dyn FeedSource>,
    articles: Arc<dyn ArticleSource>,
    /// Articles fetched at the same time
    extract_concurrency: usize,
}

impl NewsAggregator {
    /// Create a new NewsAggregator
    pub fn new(
        feed: Arc<dyn FeedSource>,
        articles: Arc<dyn ArticleSource>,
        extract_concurrency: usize,
    ) -> Self {
        Self {
            feed,
            articles,
            extract_concurrency: extract_concurrency.max(1),
        }
    }

    /// Aggregator backed by Google News and the HTML article extractor
    pub fn from_config(config: &PipelineConfig) -> Result<Self, NewsError> {
        info!(
            "Initializing NewsAggregator (max_articles={}, truncate_length={}, concurrency={})",
            config.max_articles, config.truncate_length, config.extract_concurrency
        );
        Ok(Self::new(
            Arc::new(GoogleNewsClient::new(config)?),
            Arc::new(ArticleExtractor::new(config)?),
            config.extract_concurrency,
        ))
    }

    /// Aggregate news records for a request
    ///
    /// Blank industries return `NoIndustry` without any network call. Feed
    /// failures and empty feeds both return `NoUpdates`. Only cancellation
    /// is reported as an error.
    #[instrument(skip(self, cancel), fields(industry = %request.industry))]
    pub async fn aggregate(
        &self,
        request: &AggregationRequest,
        cancel: &CancellationToken,
    ) -> InsightsResult<Aggregation> {
        let Some(industry) = request.trimmed_industry() else {
            debug!("Empty industry, skipping aggregation");
            return Ok(Aggregation::NoIndustry);
        };

        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(InsightsError::Cancelled),
            resolved = self.feed.resolve(industry) => resolved,
        };

        let candidates = match resolved {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Failed to resolve feed for '{}': {}", industry, e);
                return Ok(Aggregation::NoUpdates);
            }
        };

        if candidates.is_empty() {
            info!("No feed entries for '{}'", industry);
            return Ok(Aggregation::NoUpdates);
        }

        let selected: Vec<_> = candidates
            .into_iter()
            .take(request.article_limit())
            .collect();
        let attempted = selected.len();

        // `buffered` yields results in input order regardless of completion order
        let extraction = stream::iter(selected)
            .map(|candidate| async move {
                match self.articles.extract(&candidate).await {
                    Ok(record) => Some(record),
                    Err(e) => {
                        debug!("Dropping article {}: {}", candidate.link, e);
                        None
                    }
                }
            })
            .buffered(self.extract_concurrency)
            .filter_map(|record| async move { record })
            .collect::<Vec<_>>();

        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(InsightsError::Cancelled),
            records = extraction => records,
        };

        info!(
            "Extracted {}/{} articles for '{}'",
            records.len(),
            attempted,
            industry
        );

        Ok(Aggregation::Records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use insights_core::{NewsCandidate, NewsRecord};

    struct FakeFeed {
        candidates: Vec<NewsCandidate>,
        fail: bool,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl FakeFeed {
        fn with(n: usize) -> Self {
            Self {
                candidates: (0..n)
                    .map(|i| {
                        NewsCandidate::new(
                            format!("Story {}", i),
                            format!("https://example.com/{}", i),
                            "Mon, 06 Jan 2025 08:00:00 GMT",
                        )
                    })
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedSource for FakeFeed {
        async fn resolve(&self, industry: &str) -> Result<Vec<NewsCandidate>, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(industry.to_string());
            if self.fail {
                return Err(NewsError::RequestFailed("offline".to_string()));
            }
            Ok(self.candidates.clone())
        }
    }

    /// Fails for links in `failing`; later candidates finish first
    struct FakeArticles {
        failing: HashSet<String>,
        calls: AtomicUsize,
    }

    impl FakeArticles {
        fn new(failing: &[usize]) -> Self {
            Self {
                failing: failing
                    .iter()
                    .map(|i| format!("https://example.com/{}", i))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArticleSource for FakeArticles {
        async fn extract(&self, candidate: &NewsCandidate) -> Result<NewsRecord, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index: u64 = candidate.link.rsplit('/').next().unwrap().parse().unwrap();
            tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(index * 2))).await;
            if self.failing.contains(&candidate.link) {
                return Err(NewsError::ScrapeFailed("not an article".to_string()));
            }
            Ok(candidate.clone().into_record("article body", 1500))
        }
    }

    fn aggregator(feed: Arc<FakeFeed>, articles: Arc<FakeArticles>) -> NewsAggregator {
        NewsAggregator::new(feed, articles, 4)
    }

    #[tokio::test]
    async fn test_blank_industry_makes_no_calls() {
        let feed = Arc::new(FakeFeed::with(3));
        let articles = Arc::new(FakeArticles::new(&[]));
        let aggregator = aggregator(feed.clone(), articles.clone());

        for industry in ["", "   ", "\t\n"] {
            let result = aggregator
                .aggregate(&AggregationRequest::new(industry), &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(result, Aggregation::NoIndustry);
        }

        assert_eq!(feed.calls.load(Ordering::SeqCst), 0);
        assert_eq!(articles.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolves_once_with_trimmed_industry() {
        let feed = Arc::new(FakeFeed::with(2));
        let aggregator = aggregator(feed.clone(), Arc::new(FakeArticles::new(&[])));

        aggregator
            .aggregate(&AggregationRequest::new("  Fintech  "), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*feed.queries.lock().unwrap(), vec!["Fintech".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_feed_is_no_updates() {
        let feed = Arc::new(FakeFeed::with(0));
        let articles = Arc::new(FakeArticles::new(&[]));
        let aggregator = aggregator(feed, articles.clone());

        let result = aggregator
            .aggregate(&AggregationRequest::new("Fintech"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, Aggregation::NoUpdates);
        assert_eq!(articles.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_feed_error_is_no_updates() {
        let mut feed = FakeFeed::with(3);
        feed.fail = true;
        let aggregator = aggregator(Arc::new(feed), Arc::new(FakeArticles::new(&[])));

        let result = aggregator
            .aggregate(&AggregationRequest::new("Fintech"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, Aggregation::NoUpdates);
    }

    #[tokio::test]
    async fn test_caps_attempts_at_max_articles() {
        let feed = Arc::new(FakeFeed::with(8));
        let articles = Arc::new(FakeArticles::new(&[0, 1, 2]));
        let aggregator = aggregator(feed, articles.clone());

        let request = AggregationRequest::new("AI").with_max_articles(5);
        let result = aggregator
            .aggregate(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(articles.calls.load(Ordering::SeqCst), 5);
        assert_eq!(result.records().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_preserves_feed_order_with_failures() {
        let feed = Arc::new(FakeFeed::with(5));
        let aggregator = aggregator(feed, Arc::new(FakeArticles::new(&[1, 3])));

        let result = aggregator
            .aggregate(&AggregationRequest::new("AI"), &CancellationToken::new())
            .await
            .unwrap();

        let titles: Vec<&str> = result
            .records()
            .unwrap()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Story 0", "Story 2", "Story 4"]);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_records() {
        let feed = Arc::new(FakeFeed::with(2));
        let aggregator = aggregator(feed, Arc::new(FakeArticles::new(&[0, 1])));

        let result = aggregator
            .aggregate(&AggregationRequest::new("AI"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, Aggregation::Records(vec![]));
    }

    #[tokio::test]
    async fn test_cancelled_request() {
        let feed = Arc::new(FakeFeed::with(3));
        let aggregator = aggregator(feed.clone(), Arc::new(FakeArticles::new(&[])));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = aggregator
            .aggregate(&AggregationRequest::new("AI"), &cancel)
            .await;

        assert!(matches!(result, Err(InsightsError::Cancelled)));
        assert_eq!(feed.calls.load(Ordering::SeqCst), 0);
    }
}
