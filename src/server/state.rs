//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::Settings;
use crate::services::{EnvSnapshot, SqlGenerator};
use std::sync::Arc;
use std::time::Instant;

/// Where handlers read provider credentials from
#[derive(Debug, Clone)]
pub enum EnvSource {
    /// Fresh snapshot of the process environment on every request
    Process,
    /// Fixed snapshot (embedding and tests)
    Fixed(Arc<EnvSnapshot>),
}

impl EnvSource {
    pub fn snapshot(&self) -> EnvSnapshot {
        match self {
            EnvSource::Process => EnvSnapshot::from_process(),
            EnvSource::Fixed(env) => env.as_ref().clone(),
        }
    }
}

/// Shared application state
///
/// Cheap to clone; holds only immutable configuration and the stateless
/// SQL generator.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// SQL generator (provider resolution + generation)
    pub generator: Arc<SqlGenerator>,

    /// Credential source for provider resolution
    pub env: EnvSource,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state backed by the real provider clients
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);

        tracing::debug!(
            openai_base_url = ?settings.openai_base_url,
            bedrock_endpoint = ?settings.bedrock_endpoint_url,
            timeout_seconds = settings.llm.request_timeout_seconds,
            "Initializing SQL generator"
        );

        let generator = Arc::new(SqlGenerator::with_sdk_clients(settings.clone()));
        Self::with_generator(settings, generator, EnvSource::Process)
    }

    pub fn with_generator(settings: Arc<Settings>, generator: Arc<SqlGenerator>, env: EnvSource) -> Self {
        Self {
            settings,
            generator,
            env,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
