//! Generator seam shared by all hosted model clients

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use insights_core::GenerationConfig;

use crate::error::GenerationError;
use crate::gemini::GeminiClient;
use crate::openai::OpenAIClient;
use crate::prompts::FormattedPrompt;

/// A hosted text-generation service
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Send the prompt and return the generated text. Not retried.
    async fn generate(&self, prompt: FormattedPrompt) -> Result<String, GenerationError>;
}

/// Supported generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAI,
}

impl Provider {
    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAI => "gpt-4o",
        }
    }

    /// Build a client for this provider
    pub fn build(
        &self,
        api_key: String,
        config: GenerationConfig,
    ) -> Result<Arc<dyn InsightGenerator>, GenerationError> {
        Ok(match self {
            Provider::Gemini => Arc::new(GeminiClient::new(api_key, config)?),
            Provider::OpenAI => Arc::new(OpenAIClient::new(api_key, config)?),
        })
    }
}

impl FromStr for Provider {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            other => Err(GenerationError::Config(format!("Unknown provider: {}", other))),
        }
    }
}
