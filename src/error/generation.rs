//! SQL generation error taxonomy
//!
//! Every variant crosses the component boundary unchanged; nothing is retried
//! or swallowed here. Messages carry variable names and provider names only,
//! never credential values.

use thiserror::Error;

use crate::schemas::ProviderKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Neither provider has usable credentials
    #[error(
        "No LLM provider configured: openai requires {}; anthropic (Bedrock) requires {}",
        .openai_missing.join(", "),
        .bedrock_missing.join(", ")
    )]
    NoProviderAvailable {
        openai_missing: Vec<&'static str>,
        bedrock_missing: Vec<&'static str>,
    },

    /// A specific provider was required but its credentials are incomplete
    #[error("{provider} credentials not set: missing {}", .missing.join(", "))]
    CredentialsMissing {
        provider: ProviderKind,
        missing: Vec<&'static str>,
    },

    /// Transport, authentication, quota or response-shape failure from the provider
    #[error("Error generating SQL with {provider}: {message}")]
    ProviderError {
        provider: ProviderKind,
        message: String,
    },

    /// The request itself cannot be processed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Stable kind identifier surfaced to callers
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::NoProviderAvailable { .. } => "NoProviderAvailable",
            GenerationError::CredentialsMissing { .. } => "CredentialsMissing",
            GenerationError::ProviderError { .. } => "ProviderError",
            GenerationError::InvalidRequest(_) => "InvalidRequest",
        }
    }
}
