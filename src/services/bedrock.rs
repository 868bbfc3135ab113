//! Bedrock service for AWS Bedrock API interactions
//!
//! This module handles communication with AWS Bedrock for model inference
//! through the Converse API.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    operation::converse::{ConverseError, ConverseOutput},
    types::{
        ContentBlock, ConversationRole, InferenceConfiguration, Message as BedrockMessage,
        SystemContentBlock,
    },
    Client as BedrockRuntimeClient,
};
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;

use super::prompt::SqlPrompt;
use super::provider::{ChatProvider, InferenceParams, ProviderCallError};
use crate::schemas::ProviderKind;

/// Service for interacting with AWS Bedrock API.
///
/// Wraps a Bedrock Runtime client that was built from explicit credentials.
#[derive(Clone)]
pub struct BedrockService {
    client: BedrockRuntimeClient,
}

impl BedrockService {
    pub fn new(client: BedrockRuntimeClient) -> Self {
        Self { client }
    }

    /// Call Bedrock Converse API
    pub async fn converse(&self, request: ConverseRequest) -> Result<ConverseOutput, BedrockError> {
        tracing::debug!(
            model_id = %request.model_id,
            message_count = request.messages.len(),
            "Calling Bedrock Converse API"
        );

        let mut converse_request = self
            .client
            .converse()
            .model_id(&request.model_id)
            .set_messages(Some(request.messages));

        if let Some(system) = request.system {
            converse_request = converse_request.set_system(Some(system));
        }

        if let Some(inference_config) = request.inference_config {
            converse_request = converse_request.inference_config(inference_config);
        }

        let result = converse_request
            .send()
            .await
            .map_err(BedrockError::from_converse_error)?;

        tracing::debug!(
            stop_reason = ?result.stop_reason(),
            "Bedrock Converse API call completed"
        );

        Ok(result)
    }
}

#[async_trait]
impl ChatProvider for BedrockService {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bedrock
    }

    async fn send_chat(
        &self,
        prompt: &SqlPrompt,
        model: &str,
        params: &InferenceParams,
    ) -> Result<String, ProviderCallError> {
        let request = ConverseRequest::from_prompt(model, prompt, params)?;
        let output = self.converse(request).await?;

        first_text(&output).ok_or(ProviderCallError::EmptyResponse)
    }
}

/// First text block of the assistant message
fn first_text(output: &ConverseOutput) -> Option<String> {
    output
        .output()
        .and_then(|o| o.as_message().ok())
        .and_then(|message| {
            message.content().iter().find_map(|block| match block {
                ContentBlock::Text(text) => Some(text.clone()),
                _ => None,
            })
        })
}

/// Request for Bedrock Converse API
#[derive(Debug, Clone)]
pub struct ConverseRequest {
    /// Bedrock model ID or inference profile ARN, passed verbatim
    pub model_id: String,

    /// Conversation messages
    pub messages: Vec<BedrockMessage>,

    /// System prompts
    pub system: Option<Vec<SystemContentBlock>>,

    /// Inference configuration (temperature, max_tokens, etc.)
    pub inference_config: Option<InferenceConfiguration>,
}

impl ConverseRequest {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            messages: Vec::new(),
            system: None,
            inference_config: None,
        }
    }

    /// Single-turn request: system instruction plus one user message
    pub fn from_prompt(
        model_id: &str,
        prompt: &SqlPrompt,
        params: &InferenceParams,
    ) -> Result<Self, BedrockError> {
        let message = BedrockMessage::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.user.clone()))
            .build()
            .map_err(|e| BedrockError::Serialization(e.to_string()))?;

        Ok(Self::new(model_id)
            .with_message(message)
            .with_system(vec![SystemContentBlock::Text(prompt.system.to_string())])
            .with_inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(params.max_tokens)
                    .temperature(params.temperature)
                    .build(),
            ))
    }

    /// Add a message to the conversation
    pub fn with_message(mut self, message: BedrockMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Set system prompts
    pub fn with_system(mut self, system: Vec<SystemContentBlock>) -> Self {
        self.system = Some(system);
        self
    }

    /// Set inference configuration
    pub fn with_inference_config(mut self, config: InferenceConfiguration) -> Self {
        self.inference_config = Some(config);
        self
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during Bedrock API calls
#[derive(Debug, thiserror::Error)]
pub enum BedrockError {
    /// Request serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Throttling error (rate limited)
    #[error("Throttled: {0}")]
    Throttled(String),

    /// Validation error (invalid request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Service unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Access denied
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Internal service error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Timeout, dispatch or connection failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BedrockError {
    /// Create BedrockError from Converse API error
    pub fn from_converse_error<R>(err: SdkError<ConverseError, R>) -> Self
    where
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(service_err) => {
                let error = service_err.err();
                match error {
                    ConverseError::ThrottlingException(e) => BedrockError::Throttled(
                        e.message().unwrap_or("Rate limited").to_string(),
                    ),
                    ConverseError::ValidationException(e) => BedrockError::ValidationError(
                        e.message().unwrap_or("Validation failed").to_string(),
                    ),
                    ConverseError::ModelNotReadyException(e) => BedrockError::ServiceUnavailable(
                        e.message().unwrap_or("Model not ready").to_string(),
                    ),
                    ConverseError::ModelTimeoutException(e) => BedrockError::ServiceUnavailable(
                        e.message().unwrap_or("Model timeout").to_string(),
                    ),
                    ConverseError::InternalServerException(e) => BedrockError::InternalError(
                        e.message().unwrap_or("Internal server error").to_string(),
                    ),
                    ConverseError::AccessDeniedException(e) => BedrockError::AccessDenied(
                        e.message().unwrap_or("Access denied").to_string(),
                    ),
                    ConverseError::ResourceNotFoundException(e) => BedrockError::ModelNotFound(
                        e.message().unwrap_or("Resource not found").to_string(),
                    ),
                    _ => BedrockError::Unknown(DisplayErrorContext(error).to_string()),
                }
            }
            SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
                BedrockError::Transport(DisplayErrorContext(&err).to_string())
            }
            _ => BedrockError::Unknown(DisplayErrorContext(&err).to_string()),
        }
    }
}
