//! Insight generation for industry news
//!
//! This crate turns aggregated news records into a single prompt and sends it
//! to a hosted generative model: Google Gemini over its REST API, or OpenAI
//! through async-openai.

pub mod error;
pub mod gemini;
pub mod generator;
pub mod openai;
pub mod prompts;

pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use generator::{InsightGenerator, Provider};
pub use openai::OpenAIClient;
pub use prompts::{format_news_block, format_prompt, format_record, format_summary_prompt, FormattedPrompt};
