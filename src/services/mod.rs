//! Services module
//!
//! Credential resolution, prompt construction, provider clients and the SQL
//! generator that ties them together.

pub mod bedrock;
pub mod credentials;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod resolver;
pub mod sql_generator;

pub use bedrock::{BedrockError, BedrockService, ConverseRequest};
pub use credentials::{BedrockCredentials, EnvSnapshot, OpenAiKey, ProviderCredentials};
pub use openai::{OpenAiConfig, OpenAiService, OpenAiServiceError};
pub use prompt::{build_prompt, format_schema, SqlPrompt};
pub use provider::{
    ChatProvider, InferenceParams, ProviderCallError, ProviderFactory, SdkProviderFactory,
};
pub use resolver::{provider_status, resolve_provider, ProviderStatus};
pub use sql_generator::{
    generate_sql, resolve_model, SqlGenerator, DEFAULT_BEDROCK_MODEL, DEFAULT_OPENAI_MODEL,
};
