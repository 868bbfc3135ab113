//! Chat provider capability
//!
//! The SQL generator only sees [`ChatProvider`]: send one prompt, get one
//! text reply. Concrete clients are built per call by a [`ProviderFactory`],
//! the only place that matches on the provider variant.

use async_trait::async_trait;
use std::sync::Arc;

use super::bedrock::{BedrockError, BedrockService};
use super::credentials::ProviderCredentials;
use super::openai::{OpenAiConfig, OpenAiService, OpenAiServiceError};
use super::prompt::SqlPrompt;
use crate::config::{create_bedrock_client, LlmConfig, Settings};
use crate::schemas::ProviderKind;

/// Sampling bounds applied to one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: i32,
    pub temperature: f32,
}

impl From<&LlmConfig> for InferenceParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Failure of a single provider call
#[derive(Debug, thiserror::Error)]
pub enum ProviderCallError {
    #[error(transparent)]
    OpenAi(#[from] OpenAiServiceError),

    #[error(transparent)]
    Bedrock(#[from] BedrockError),

    #[error("Provider returned no text content")]
    EmptyResponse,
}

/// Chat completion with a single text response
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn send_chat(
        &self,
        prompt: &SqlPrompt,
        model: &str,
        params: &InferenceParams,
    ) -> Result<String, ProviderCallError>;
}

/// Builds an authenticated client for one set of credentials
pub trait ProviderFactory: Send + Sync {
    fn build(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn ChatProvider>, ProviderCallError>;
}

/// Factory backed by the real OpenAI HTTP API and the AWS Bedrock SDK
#[derive(Clone)]
pub struct SdkProviderFactory {
    settings: Arc<Settings>,
}

impl SdkProviderFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

impl ProviderFactory for SdkProviderFactory {
    fn build(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn ChatProvider>, ProviderCallError> {
        match credentials {
            ProviderCredentials::OpenAi(openai) => {
                let mut config = OpenAiConfig::new(openai.key.clone())
                    .with_timeout(self.settings.llm.request_timeout_seconds);
                if let Some(base_url) = &self.settings.openai_base_url {
                    config = config.with_base_url(base_url.clone());
                }
                Ok(Arc::new(OpenAiService::new(config)?))
            }
            ProviderCredentials::Bedrock(bedrock) => {
                tracing::debug!(region = %bedrock.region, "Creating Bedrock client");
                let client = create_bedrock_client(&self.settings, bedrock);
                Ok(Arc::new(BedrockService::new(client)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::credentials::{BedrockCredentials, OpenAiKey};

    #[test]
    fn test_inference_params_from_config() {
        let params = InferenceParams::from(&LlmConfig::default());
        assert_eq!(params.max_tokens, 500);
        assert!((params.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_factory_builds_matching_provider() {
        let factory = SdkProviderFactory::new(Arc::new(Settings::default()));

        let openai = factory
            .build(&ProviderCredentials::OpenAi(OpenAiKey {
                key: "sk-test".to_string(),
            }))
            .unwrap();
        assert_eq!(openai.kind(), ProviderKind::OpenAi);

        let bedrock = factory
            .build(&ProviderCredentials::Bedrock(BedrockCredentials {
                access_key_id: "AKIATEST".to_string(),
                secret_access_key: "secret".to_string(),
                region: "eu-west-3".to_string(),
                session_token: None,
            }))
            .unwrap();
        assert_eq!(bedrock.kind(), ProviderKind::Bedrock);
    }
}
