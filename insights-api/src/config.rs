//! Environment configuration for the API server

use std::str::FromStr;

use insights_core::{
    EmptyResultsPolicy, GenerationConfig, InsightsError, InsightsResult, PipelineConfig,
    RecordLayout, ReportStyle, TemplateVariant,
};
use insights_research::Provider;

const DEFAULT_PORT: u16 = 3001;

/// One generation stage: which provider, which key, which settings
#[derive(Debug, Clone)]
pub struct StageConfig {
    pub provider: Provider,
    pub api_key: String,
    pub generation: GenerationConfig,
}

/// Everything the server needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub primary: StageConfig,
    /// Only set when two-stage summaries are enabled
    pub summary: Option<StageConfig>,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> InsightsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> InsightsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = PipelineConfig::default();
        let layout = parse_or(var("RECORD_LAYOUT"), RecordLayout::default())?;
        let report = parse_or(var("REPORT_STYLE"), ReportStyle::default())?;

        let pipeline = PipelineConfig {
            max_articles: parse_number("MAX_ARTICLES", var("MAX_ARTICLES"), defaults.max_articles)?
                .max(1),
            truncate_length: parse_number(
                "TRUNCATE_LENGTH",
                var("TRUNCATE_LENGTH"),
                defaults.truncate_length,
            )?,
            template_variant: TemplateVariant::new(layout, report),
            empty_results_policy: parse_or(
                var("EMPTY_RESULTS_POLICY"),
                EmptyResultsPolicy::default(),
            )?,
            two_stage_summary: parse_bool("TWO_STAGE_SUMMARY", var("TWO_STAGE_SUMMARY"))?,
            ..defaults
        };

        let provider = match var("INSIGHTS_PROVIDER") {
            Some(name) => name.parse::<Provider>()?,
            None => Provider::Gemini,
        };
        let primary = stage(&var, provider, var("INSIGHTS_MODEL"))?;

        let summary = if pipeline.two_stage_summary {
            let summary_provider = match var("SUMMARY_PROVIDER") {
                Some(name) => name.parse::<Provider>()?,
                None => primary.provider,
            };
            let model = var("SUMMARY_MODEL").or_else(|| {
                (summary_provider == primary.provider).then(|| primary.generation.model.clone())
            });
            Some(stage(&var, summary_provider, model)?)
        } else {
            None
        };

        let port = parse_number("SERVER_PORT", var("SERVER_PORT"), DEFAULT_PORT)?;

        Ok(Self {
            pipeline,
            primary,
            summary,
            port,
        })
    }
}

fn stage<F>(var: &F, provider: Provider, model: Option<String>) -> InsightsResult<StageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let key_var = provider.api_key_var();
    let api_key = var(key_var)
        .ok_or_else(|| InsightsError::config(format!("{} must be set", key_var)))?;
    let model = model.unwrap_or_else(|| provider.default_model().to_string());

    Ok(StageConfig {
        provider,
        api_key,
        generation: GenerationConfig::default().with_model(&model),
    })
}

fn parse_or<T>(value: Option<String>, default: T) -> InsightsResult<T>
where
    T: FromStr<Err = InsightsError>,
{
    value.map_or(Ok(default), |v| v.parse())
}

fn parse_number<T: FromStr>(key: &str, value: Option<String>, default: T) -> InsightsResult<T> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| InsightsError::config(format!("{} must be a number, got '{}'", key, v))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: Option<String>) -> InsightsResult<bool> {
    match value.as_deref().map(str::to_lowercase).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(InsightsError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
