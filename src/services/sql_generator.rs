//! SQL generation
//!
//! Turns a [`GenerationRequest`] into a [`GenerationResult`]: resolve the
//! provider, load its credentials, build a client, send one prompt and
//! normalize the reply. Each call is a single request/response exchange with
//! no retries and no state carried between calls.

use std::sync::Arc;

use super::credentials::{EnvSnapshot, ProviderCredentials, ANTHROPIC_MODEL};
use super::prompt::build_prompt;
use super::provider::{
    ChatProvider, InferenceParams, ProviderCallError, ProviderFactory, SdkProviderFactory,
};
use super::resolver::resolve_provider;
use crate::config::Settings;
use crate::error::GenerationError;
use crate::schemas::{GenerationRequest, GenerationResult, ProviderKind};
use crate::utils::{normalize_sql, truncate_with_suffix};

/// Default model for the OpenAI direct API
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

/// Default Bedrock model (cross-region inference profile)
pub const DEFAULT_BEDROCK_MODEL: &str = "us.anthropic.claude-3-haiku-20240307-v1:0";

/// Model used for a call
///
/// An explicit override wins and is passed verbatim. Bedrock then honors
/// `ANTHROPIC_MODEL`; otherwise the provider's default constant applies.
pub fn resolve_model(provider: ProviderKind, model_override: Option<&str>, env: &EnvSnapshot) -> String {
    if let Some(model) = model_override {
        return model.to_string();
    }

    match provider {
        ProviderKind::OpenAi => DEFAULT_OPENAI_MODEL.to_string(),
        ProviderKind::Bedrock => env
            .get(ANTHROPIC_MODEL)
            .unwrap_or(DEFAULT_BEDROCK_MODEL)
            .to_string(),
    }
}

/// Send the prompt for `request` through `client` and normalize the reply
pub async fn generate_sql(
    client: &dyn ChatProvider,
    request: &GenerationRequest,
    model: &str,
    params: &InferenceParams,
) -> Result<GenerationResult, ProviderCallError> {
    let prompt = build_prompt(&request.schema, &request.question);
    let text = client.send_chat(&prompt, model, params).await?;

    let sql = normalize_sql(&text);
    if sql.is_empty() {
        return Err(ProviderCallError::EmptyResponse);
    }

    Ok(GenerationResult {
        sql,
        provider: client.kind(),
    })
}

/// Entry point used by the HTTP handler and the CLI
#[derive(Clone)]
pub struct SqlGenerator {
    settings: Arc<Settings>,
    factory: Arc<dyn ProviderFactory>,
}

impl SqlGenerator {
    pub fn new(settings: Arc<Settings>, factory: Arc<dyn ProviderFactory>) -> Self {
        Self { settings, factory }
    }

    /// Generator backed by the real OpenAI and Bedrock clients
    pub fn with_sdk_clients(settings: Arc<Settings>) -> Self {
        let factory = Arc::new(SdkProviderFactory::new(settings.clone()));
        Self::new(settings, factory)
    }

    pub fn inference_params(&self) -> InferenceParams {
        InferenceParams::from(&self.settings.llm)
    }

    /// Generate SQL with whichever provider the resolver selects
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        env: &EnvSnapshot,
    ) -> Result<GenerationResult, GenerationError> {
        validate_request(request)?;
        let provider = resolve_provider(env, request.provider_preference)?;
        self.run(request, provider, env).await
    }

    /// Generate SQL with exactly `provider`, failing if it is not configured
    pub async fn generate_with_provider(
        &self,
        request: &GenerationRequest,
        provider: ProviderKind,
        env: &EnvSnapshot,
    ) -> Result<GenerationResult, GenerationError> {
        validate_request(request)?;
        self.run(request, provider, env).await
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        provider: ProviderKind,
        env: &EnvSnapshot,
    ) -> Result<GenerationResult, GenerationError> {
        let credentials = ProviderCredentials::from_env(provider, env)?;
        let model = resolve_model(provider, request.model_override(), env);

        tracing::info!(
            provider = %provider,
            model = %model,
            tables = request.schema.tables.len(),
            "Generating SQL"
        );

        let client = self
            .factory
            .build(&credentials)
            .map_err(|e| provider_error(&credentials, e))?;

        let result = generate_sql(client.as_ref(), request, &model, &self.inference_params())
            .await
            .map_err(|e| provider_error(&credentials, e))?;

        tracing::debug!(
            provider = %result.provider,
            sql = %truncate_with_suffix(&result.sql, 200, "..."),
            "SQL generated"
        );

        Ok(result)
    }
}

fn validate_request(request: &GenerationRequest) -> Result<(), GenerationError> {
    if request.question.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(
            "question must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Flatten a call failure, scrubbing any credential value from the message
fn provider_error(credentials: &ProviderCredentials, err: ProviderCallError) -> GenerationError {
    let provider = credentials.kind();
    let message = credentials.redact(&err.to_string());

    tracing::warn!(provider = %provider, error = %message, "Provider call failed");

    GenerationError::ProviderError { provider, message }
}
