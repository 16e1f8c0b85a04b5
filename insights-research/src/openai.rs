use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use tracing::instrument;

use insights_core::GenerationConfig;

use crate::error::GenerationError;
use crate::generator::InsightGenerator;
use crate::prompts::FormattedPrompt;

/// OpenAI chat completion client
///
/// `top_k` has no chat completion equivalent and is not sent.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    config: GenerationConfig,
}

impl OpenAIClient {
    pub fn new(api_key: String, config: GenerationConfig) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::Config("OPENAI_API_KEY is empty".to_string()));
        }

        let openai_config = OpenAIConfig::new().with_api_key(api_key);

        Ok(Self {
            client: Client::with_config(openai_config),
            config,
        })
    }
}

#[async_trait]
impl InsightGenerator for OpenAIClient {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    async fn generate(&self, prompt: FormattedPrompt) -> Result<String, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.into_inner())
                .build()
                .map_err(|e| GenerationError::Parse(e.to_string()))?
                .into()])
            .temperature(self.config.temperature)
            .top_p(self.config.top_p)
            .max_completion_tokens(self.config.max_output_tokens)
            .build()
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let response = tokio::time::timeout(self.config.timeout(), self.client.chat().create(request))
            .await
            .map_err(|_| {
                GenerationError::Request(format!(
                    "OpenAI request timed out after {}s",
                    self.config.timeout_secs
                ))
            })?
            .map_err(|e| GenerationError::Request(format!("OpenAI API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::EmptyResponse("no choices".to_string()))?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(GenerationError::EmptyResponse(
                choice
                    .finish_reason
                    .map(|reason| format!("{:?}", reason))
                    .unwrap_or_else(|| "empty content".to_string()),
            )),
        }
    }
}
