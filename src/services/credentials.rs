//! Provider credentials and the environment view they are read from
//!
//! Credentials are always threaded explicitly from an [`EnvSnapshot`] into the
//! provider clients. No SDK default credential chain is consulted, so a
//! missing variable surfaces as a named, pre-flight error.

use std::collections::HashMap;
use std::fmt;

use crate::error::GenerationError;
use crate::schemas::ProviderKind;

// ============================================================================
// Environment variable names
// ============================================================================

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Legacy alias accepted for the access key id
pub const AWS_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const AWS_REGION: &str = "AWS_REGION";
pub const ANTHROPIC_MODEL: &str = "ANTHROPIC_MODEL";

/// Region used for Bedrock when `AWS_REGION` is unset
pub const DEFAULT_AWS_REGION: &str = "eu-west-3";

const REDACTED: &str = "[REDACTED]";

/// Secrets shorter than this are not substituted, to avoid mangling messages
const MIN_REDACT_LEN: usize = 4;

// ============================================================================
// Environment Snapshot
// ============================================================================

/// Read-only view of environment variables
///
/// A variable only counts as set when it is present and not blank.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a variable, `None` when unset or blank
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Access key id, falling back to the legacy alias
    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.get(AWS_ACCESS_KEY_ID).or_else(|| self.get(AWS_ACCESS_KEY))
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("EnvSnapshot").field("keys", &keys).finish()
    }
}

// ============================================================================
// Provider Credentials
// ============================================================================

/// Direct API key for the OpenAI provider
#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiKey {
    pub key: String,
}

/// Explicit AWS credential tuple for Bedrock
#[derive(Clone, PartialEq, Eq)]
pub struct BedrockCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub session_token: Option<String>,
}

/// Credentials for exactly one provider
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderCredentials {
    OpenAi(OpenAiKey),
    Bedrock(BedrockCredentials),
}

impl ProviderCredentials {
    /// Load the credentials a provider needs
    ///
    /// Fails with `CredentialsMissing` naming every absent variable.
    pub fn from_env(provider: ProviderKind, env: &EnvSnapshot) -> Result<Self, GenerationError> {
        match provider {
            ProviderKind::OpenAi => match env.get(OPENAI_API_KEY) {
                Some(key) => Ok(ProviderCredentials::OpenAi(OpenAiKey {
                    key: key.to_string(),
                })),
                None => Err(GenerationError::CredentialsMissing {
                    provider,
                    missing: vec![OPENAI_API_KEY],
                }),
            },
            ProviderKind::Bedrock => match (env.aws_access_key_id(), env.get(AWS_SECRET_ACCESS_KEY)) {
                (Some(access_key_id), Some(secret_access_key)) => {
                    Ok(ProviderCredentials::Bedrock(BedrockCredentials {
                        access_key_id: access_key_id.to_string(),
                        secret_access_key: secret_access_key.to_string(),
                        region: env.get(AWS_REGION).unwrap_or(DEFAULT_AWS_REGION).to_string(),
                        session_token: env.get(AWS_SESSION_TOKEN).map(str::to_string),
                    }))
                }
                _ => Err(GenerationError::CredentialsMissing {
                    provider,
                    missing: missing_variables(provider, env),
                }),
            },
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderCredentials::OpenAi(_) => ProviderKind::OpenAi,
            ProviderCredentials::Bedrock(_) => ProviderKind::Bedrock,
        }
    }

    fn secrets(&self) -> Vec<&str> {
        match self {
            ProviderCredentials::OpenAi(openai) => vec![openai.key.as_str()],
            ProviderCredentials::Bedrock(bedrock) => {
                let mut secrets = vec![
                    bedrock.access_key_id.as_str(),
                    bedrock.secret_access_key.as_str(),
                ];
                if let Some(token) = &bedrock.session_token {
                    secrets.push(token.as_str());
                }
                secrets
            }
        }
    }

    /// Replace any credential value found in `text`
    pub fn redact(&self, text: &str) -> String {
        self.secrets()
            .into_iter()
            .filter(|secret| secret.len() >= MIN_REDACT_LEN)
            .fold(text.to_string(), |acc, secret| acc.replace(secret, REDACTED))
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderCredentials::OpenAi(_) => f
                .debug_struct("OpenAi")
                .field("key", &REDACTED)
                .finish(),
            ProviderCredentials::Bedrock(bedrock) => f
                .debug_struct("Bedrock")
                .field("access_key_id", &REDACTED)
                .field("secret_access_key", &REDACTED)
                .field("region", &bedrock.region)
                .field("session_token", &bedrock.session_token.as_ref().map(|_| REDACTED))
                .finish(),
        }
    }
}

/// Variables a provider still needs, empty when it is usable
pub fn missing_variables(provider: ProviderKind, env: &EnvSnapshot) -> Vec<&'static str> {
    let mut missing = Vec::new();
    match provider {
        ProviderKind::OpenAi => {
            if !env.is_set(OPENAI_API_KEY) {
                missing.push(OPENAI_API_KEY);
            }
        }
        ProviderKind::Bedrock => {
            if env.aws_access_key_id().is_none() {
                missing.push(AWS_ACCESS_KEY_ID);
            }
            if !env.is_set(AWS_SECRET_ACCESS_KEY) {
                missing.push(AWS_SECRET_ACCESS_KEY);
            }
        }
    }
    missing
}
