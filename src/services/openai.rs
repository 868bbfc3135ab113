//! OpenAI service for Chat Completions API interactions
//!
//! Thin REST client over `reqwest`, authenticated with a bearer API key.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::prompt::SqlPrompt;
use super::provider::{ChatProvider, InferenceParams, ProviderCallError};
use crate::schemas::openai::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAIErrorResponse,
};
use crate::schemas::ProviderKind;
use crate::utils::truncate_with_suffix;

// ============================================================================
// Constants
// ============================================================================

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Longest error body carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the OpenAI API
#[derive(Error, Debug)]
pub enum OpenAiServiceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// OpenAI Service
// ============================================================================

/// Configuration for OpenAI service
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,

    /// Base URL (default: api.openai.com/v1)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_seconds: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Service for interacting with the OpenAI Chat Completions API
#[derive(Clone)]
pub struct OpenAiService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiService {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(OpenAiServiceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| OPENAI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Create a chat completion (non-streaming)
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiServiceError> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            model = %request.model,
            url = %url,
            "Calling OpenAI chat completions API"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let response_text = resp.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<OpenAIErrorResponse>(&response_text) {
                Ok(error) => error.error.message,
                Err(_) => truncate_with_suffix(&response_text, MAX_ERROR_BODY_CHARS, "..."),
            };

            return Err(OpenAiServiceError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse OpenAI response");
            OpenAiServiceError::ParseError(e.to_string())
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiService {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send_chat(
        &self,
        prompt: &SqlPrompt,
        model: &str,
        params: &InferenceParams,
    ) -> Result<String, ProviderCallError> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(prompt.system),
                ChatMessage::user(prompt.user.clone()),
            ],
            temperature: Some(params.temperature),
            max_tokens: Some(params.max_tokens),
        };

        let response = self.chat_completion(&request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI chat completion finished"
            );
        }

        response
            .first_text()
            .map(str::to_string)
            .ok_or(ProviderCallError::EmptyResponse)
    }
}
