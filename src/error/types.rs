//! API error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::GenerationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Generation(err) => match err {
                GenerationError::NoProviderAvailable { .. }
                | GenerationError::CredentialsMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
                GenerationError::ProviderError { .. } => StatusCode::BAD_GATEWAY,
                GenerationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Generation(err) => err.kind(),
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        let message = match &self {
            ApiError::Generation(err) => err.to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::warn!(kind, status = status.as_u16(), error = %message, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                kind: kind.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    kind: String,
    message: String,
}
