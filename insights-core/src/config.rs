//! Pipeline configuration
//!
//! Built once at process start and shared read-only by every request.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::InsightsError;
use crate::news::{DEFAULT_MAX_ARTICLES, DEFAULT_TRUNCATE_LENGTH};

/// How each news record is rendered inside the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayout {
    /// `Title:` / `Published:` / `Content:` labelled fields
    Plain,
    /// Markdown heading linking to the article
    Markdown,
    /// Styled `news-card` HTML fragment
    #[default]
    Html,
}

/// Which report sections the model is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Key Trends, Challenges & Risks, Future Predictions
    #[default]
    Insights,
    /// Five-section executive report
    Executive,
}

/// Prompt template selection: record markup plus section taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateVariant {
    pub layout: RecordLayout,
    pub report: ReportStyle,
}

impl TemplateVariant {
    pub fn new(layout: RecordLayout, report: ReportStyle) -> Self {
        Self { layout, report }
    }
}

/// What to do when every article failed extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultsPolicy {
    /// Stop with the "no updates" sentinel, no generation call
    WarnOnly,
    /// Call the generator with an empty news block
    #[default]
    ProceedWithEmptyBlock,
}

impl FromStr for RecordLayout {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(RecordLayout::Plain),
            "markdown" | "md" => Ok(RecordLayout::Markdown),
            "html" => Ok(RecordLayout::Html),
            other => Err(InsightsError::config(format!("Unknown record layout: {}", other))),
        }
    }
}

impl FromStr for ReportStyle {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insights" => Ok(ReportStyle::Insights),
            "executive" => Ok(ReportStyle::Executive),
            other => Err(InsightsError::config(format!("Unknown report style: {}", other))),
        }
    }
}

impl FromStr for EmptyResultsPolicy {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn_only" | "warn" => Ok(EmptyResultsPolicy::WarnOnly),
            "proceed_with_empty_block" | "proceed" => Ok(EmptyResultsPolicy::ProceedWithEmptyBlock),
            other => Err(InsightsError::config(format!(
                "Unknown empty results policy: {}",
                other
            ))),
        }
    }
}

/// Configuration for the news ingestion and prompt pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum feed entries scraped per request
    pub max_articles: usize,
    /// Characters kept from each article before the marker
    pub truncate_length: usize,
    /// Prompt markup and section taxonomy
    pub template_variant: TemplateVariant,
    /// Behaviour when no article could be extracted
    pub empty_results_policy: EmptyResultsPolicy,
    /// Chain a second generation call that summarises the first
    pub two_stage_summary: bool,
    /// Articles fetched concurrently (output order is unaffected)
    pub extract_concurrency: usize,
    /// Timeout for the feed request (in seconds)
    pub feed_timeout_secs: u64,
    /// Timeout for each article request (in seconds)
    pub article_timeout_secs: u64,
    /// Syndication search endpoint
    pub feed_endpoint: String,
    /// Disjunctive keywords appended to the industry name
    pub query_hints: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_articles: DEFAULT_MAX_ARTICLES,
            truncate_length: DEFAULT_TRUNCATE_LENGTH,
            template_variant: TemplateVariant::default(),
            empty_results_policy: EmptyResultsPolicy::default(),
            two_stage_summary: false,
            extract_concurrency: 4,
            feed_timeout_secs: 10,
            article_timeout_secs: 5,
            feed_endpoint: "https://news.google.com/rss/search".to_string(),
            query_hints: "technology OR innovation OR AI news".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }
}

/// Sampling parameters for the generative model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model name understood by the provider
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Timeout for a single generation call (in seconds)
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.9,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 10000,
            timeout_secs: 30,
        }
    }
}

impl GenerationConfig {
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
