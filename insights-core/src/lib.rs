//! Core types for the Industry Insights pipeline
//!
//! This crate defines the shared data structures used across the workspace,
//! including news candidates and records, pipeline configuration and the
//! workspace-wide error type.

pub mod config;
pub mod error;
pub mod news;

pub use config::{
    EmptyResultsPolicy, GenerationConfig, PipelineConfig, RecordLayout, ReportStyle,
    TemplateVariant,
};
pub use error::{InsightsError, InsightsResult};
pub use news::{
    truncate_content, Aggregation, AggregationRequest, NewsCandidate, NewsRecord,
    DEFAULT_MAX_ARTICLES, DEFAULT_TRUNCATE_LENGTH, TRUNCATION_MARKER,
};
