//! Health and provider status endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::schemas::ProviderKind;
use crate::server::state::AppState;
use crate::services::{provider_status, resolve_provider, ProviderStatus};

/// Response for the main health check endpoint
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
}

/// Response for liveness probe
#[derive(Serialize)]
pub struct LivenessResponse {
    pub alive: bool,
}

/// Which providers are configured, without any credential values
#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderStatus>,
    /// Provider used when a request states no preference
    pub default_provider: Option<ProviderKind>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// GET /liveness
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { alive: true })
}

/// GET /api/providers
pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let env = state.env.snapshot();

    Json(ProvidersResponse {
        providers: provider_status(&env),
        default_provider: resolve_provider(&env, None).ok(),
    })
}
