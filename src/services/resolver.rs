//! Provider resolution
//!
//! Decides which provider serves a request from credential availability and
//! the caller's optional preference. Pure: reads the snapshot, never the network.
//!
//! Policy, in order:
//! 1. the preferred provider, if it is available
//! 2. OpenAI, if available
//! 3. Bedrock, if available
//! 4. `NoProviderAvailable`
//!
//! A preference for an unconfigured provider falls through to the priority
//! order. Callers that need a specific provider use
//! [`SqlGenerator::generate_with_provider`](super::SqlGenerator::generate_with_provider).

use serde::Serialize;

use super::credentials::{missing_variables, EnvSnapshot};
use crate::error::GenerationError;
use crate::schemas::ProviderKind;

/// Providers in default priority order
const PRIORITY: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Bedrock];

pub fn is_available(provider: ProviderKind, env: &EnvSnapshot) -> bool {
    missing_variables(provider, env).is_empty()
}

/// Pick the provider for one request
pub fn resolve_provider(
    env: &EnvSnapshot,
    preference: Option<ProviderKind>,
) -> Result<ProviderKind, GenerationError> {
    if let Some(preferred) = preference {
        if is_available(preferred, env) {
            return Ok(preferred);
        }
    }

    match PRIORITY.into_iter().find(|provider| is_available(*provider, env)) {
        Some(provider) => {
            if let Some(preferred) = preference {
                tracing::warn!(
                    preferred = %preferred,
                    selected = %provider,
                    "Preferred provider has no credentials, falling back"
                );
            }
            Ok(provider)
        }
        None => Err(GenerationError::NoProviderAvailable {
            openai_missing: missing_variables(ProviderKind::OpenAi, env),
            bedrock_missing: missing_variables(ProviderKind::Bedrock, env),
        }),
    }
}

/// Availability of one provider, without any credential values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub available: bool,
    pub missing: Vec<&'static str>,
}

/// Availability of every provider, in priority order
pub fn provider_status(env: &EnvSnapshot) -> Vec<ProviderStatus> {
    PRIORITY
        .into_iter()
        .map(|provider| {
            let missing = missing_variables(provider, env);
            ProviderStatus {
                provider,
                available: missing.is_empty(),
                missing,
            }
        })
        .collect()
}
