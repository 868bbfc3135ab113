//! SQL generation endpoint
//!
//! POST /api/sql/generate

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::ApiError;
use crate::schemas::{GenerationRequest, GenerationResult};
use crate::server::state::AppState;

/// Generate one SQL statement for a natural-language question
pub async fn generate_sql(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let Json(request) = payload?;
    let env = state.env.snapshot();

    let result = state.generator.generate(&request, &env).await?;

    Ok(Json(result))
}
