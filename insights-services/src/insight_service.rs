//! Insight service
//!
//! Runs one request through the whole pipeline: aggregation, prompt
//! assembly and generation, with an optional second summarizing pass.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use insights_core::{
    Aggregation, AggregationRequest, EmptyResultsPolicy, InsightsError, InsightsResult,
    NewsRecord, PipelineConfig,
};
use insights_research::{
    format_prompt, format_summary_prompt, FormattedPrompt, GenerationError, InsightGenerator,
};

use crate::news_aggregator::NewsAggregator;

/// Generated report plus the articles it was built from
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub industry: String,
    pub insights: String,
    /// Second-stage condensed brief, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub articles: Vec<NewsRecord>,
}

/// Outcome of an insights request
#[derive(Debug, Clone)]
pub enum InsightOutcome {
    Report(InsightReport),
    /// Blank industry, nothing was fetched
    NoIndustry,
    /// The feed had nothing usable, the generator was not called
    NoUpdates,
}

/// Service for turning an industry name into an insights report
pub struct InsightService {
    aggregator: NewsAggregator,
    generator: Arc<dyn InsightGenerator>,
    summarizer: Option<Arc<dyn InsightGenerator>>,
    config: PipelineConfig,
}

impl InsightService {
    /// Create a new insight service
    pub fn new(
        aggregator: NewsAggregator,
        generator: Arc<dyn InsightGenerator>,
        config: PipelineConfig,
    ) -> Self {
        info!(
            "Initializing InsightService (generator={}, two_stage_summary={})",
            generator.name(),
            config.two_stage_summary
        );
        Self {
            aggregator,
            generator,
            summarizer: None,
            config,
        }
    }

    /// Use a separate generator for the summary stage
    pub fn with_summarizer(mut self, summarizer: Arc<dyn InsightGenerator>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Request for `industry` with the configured article cap
    pub fn request(&self, industry: impl Into<String>) -> AggregationRequest {
        AggregationRequest::new(industry).with_max_articles(self.config.max_articles)
    }

    /// Request with a caller-supplied cap, which can only lower the configured one
    pub fn request_capped(
        &self,
        industry: impl Into<String>,
        max_articles: Option<usize>,
    ) -> AggregationRequest {
        let limit = max_articles.map_or(self.config.max_articles, |n| {
            n.min(self.config.max_articles)
        });
        AggregationRequest::new(industry).with_max_articles(limit)
    }

    /// Aggregate news without generating anything
    pub async fn aggregate_news(
        &self,
        request: &AggregationRequest,
        cancel: &CancellationToken,
    ) -> InsightsResult<Aggregation> {
        self.aggregator.aggregate(request, cancel).await
    }

    /// Run the full pipeline for one request
    ///
    /// Generation failures are returned as `InsightsError::Generation` and
    /// are never retried.
    #[instrument(skip(self, cancel), fields(industry = %request.industry))]
    pub async fn generate_insights(
        &self,
        request: &AggregationRequest,
        cancel: &CancellationToken,
    ) -> InsightsResult<InsightOutcome> {
        let records = match self.aggregator.aggregate(request, cancel).await? {
            Aggregation::NoIndustry => return Ok(InsightOutcome::NoIndustry),
            Aggregation::NoUpdates => return Ok(InsightOutcome::NoUpdates),
            Aggregation::Records(records) => records,
        };

        // trimmed_industry is Some once aggregation returned records
        let industry = request.trimmed_industry().unwrap_or_default().to_string();

        if records.is_empty() {
            match self.config.empty_results_policy {
                EmptyResultsPolicy::WarnOnly => {
                    warn!("No articles could be extracted for '{}'", industry);
                    return Ok(InsightOutcome::NoUpdates);
                }
                EmptyResultsPolicy::ProceedWithEmptyBlock => {
                    warn!(
                        "No articles could be extracted for '{}', generating from an empty news block",
                        industry
                    );
                }
            }
        }

        let prompt = format_prompt(&records, &industry, self.config.template_variant);
        let insights = self
            .run_generator(self.generator.as_ref(), prompt, cancel)
            .await?;

        let summary = if self.config.two_stage_summary {
            let summarizer = self.summarizer.as_ref().unwrap_or(&self.generator);
            let prompt = format_summary_prompt(&industry, &insights);
            Some(self.run_generator(summarizer.as_ref(), prompt, cancel).await?)
        } else {
            None
        };

        info!(
            "Generated insights for '{}' from {} articles",
            industry,
            records.len()
        );

        Ok(InsightOutcome::Report(InsightReport {
            industry,
            insights,
            summary,
            articles: records,
        }))
    }

    async fn run_generator(
        &self,
        generator: &dyn InsightGenerator,
        prompt: FormattedPrompt,
        cancel: &CancellationToken,
    ) -> InsightsResult<String> {
        let result = with_cancel(cancel, generator.generate(prompt)).await?;
        result.map_err(|e: GenerationError| {
            error!("{} generation failed: {}", generator.name(), e);
            InsightsError::from(e)
        })
    }
}

async fn with_cancel<F: Future>(cancel: &CancellationToken, future: F) -> InsightsResult<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(InsightsError::Cancelled),
        output = future => Ok(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use insights_core::NewsCandidate;
    use insights_news::{ArticleSource, FeedSource, NewsError};

    struct StaticFeed(Vec<NewsCandidate>);

    #[async_trait]
    impl FeedSource for StaticFeed {
        async fn resolve(&self, _industry: &str) -> Result<Vec<NewsCandidate>, NewsError> {
            Ok(self.0.clone())
        }
    }

    struct FailingArticles;

    #[async_trait]
    impl ArticleSource for FailingArticles {
        async fn extract(&self, _candidate: &NewsCandidate) -> Result<NewsRecord, NewsError> {
            Err(NewsError::ScrapeFailed("paywall".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InsightGenerator for RecordingGenerator {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, prompt: FormattedPrompt) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.into_inner());
            Ok("**Trend**".to_string())
        }
    }

    fn service(policy: EmptyResultsPolicy, generator: Arc<RecordingGenerator>) -> InsightService {
        let feed = StaticFeed(vec![NewsCandidate::new(
            "Story",
            "https://example.com/1",
            "",
        )]);
        let aggregator = NewsAggregator::new(Arc::new(feed), Arc::new(FailingArticles), 2);
        let config = PipelineConfig {
            empty_results_policy: policy,
            ..PipelineConfig::default()
        };
        InsightService::new(aggregator, generator, config)
    }

    #[tokio::test]
    async fn test_warn_only_skips_generation() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = service(EmptyResultsPolicy::WarnOnly, generator.clone());

        let outcome = service
            .generate_insights(&service.request("AI"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, InsightOutcome::NoUpdates));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_proceed_sends_empty_block() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = service(EmptyResultsPolicy::ProceedWithEmptyBlock, generator.clone());

        let outcome = service
            .generate_insights(&service.request("AI"), &CancellationToken::new())
            .await
            .unwrap();

        match outcome {
            InsightOutcome::Report(report) => {
                assert!(report.articles.is_empty());
                assert_eq!(report.insights, "**Trend**");
                assert!(report.summary.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(generator.prompts.lock().unwrap()[0].contains("about the AI industry"));
    }

    #[tokio::test]
    async fn test_request_uses_configured_cap() {
        let service = service(
            EmptyResultsPolicy::default(),
            Arc::new(RecordingGenerator::default()),
        );
        assert_eq!(service.request("AI").max_articles, 10);
    }

    #[tokio::test]
    async fn test_caller_cap_cannot_exceed_configured() {
        let service = service(
            EmptyResultsPolicy::default(),
            Arc::new(RecordingGenerator::default()),
        );
        assert_eq!(service.request_capped("AI", Some(500)).max_articles, 10);
        assert_eq!(service.request_capped("AI", Some(3)).max_articles, 3);
        assert_eq!(service.request_capped("AI", None).max_articles, 10);
    }

    #[test]
    fn test_report_serialization_omits_missing_summary() {
        let report = InsightReport {
            industry: "AI".to_string(),
            insights: "text".to_string(),
            summary: None,
            articles: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("summary").is_none());
        assert_eq!(json["industry"], "AI");
    }
}
