//! Request logging middleware
//!
//! Every request gets a trace ID (taken from `x-trace-id` / `x-request-id`
//! when the caller supplies one). The ID is stored in request extensions,
//! attached to the request span and echoed back on the response.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for trace ID
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Header name for request ID (alias for trace ID)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied trace ID we propagate
const MAX_TRACE_ID_LEN: usize = 128;

/// Correlation ID for one request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trace ID supplied by the caller, falling back to a fresh UUID
    fn from_request(request: &Request) -> Self {
        [TRACE_ID_HEADER, REQUEST_ID_HEADER]
            .iter()
            .filter_map(|name| request.headers().get(*name))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|id| !id.is_empty() && id.len() <= MAX_TRACE_ID_LEN)
            .map(|id| Self(id.to_string()))
            .unwrap_or_default()
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Log one line per request and one per response, tagged with the trace ID
///
/// ```ignore
/// Router::new()
///     .layer(axum::middleware::from_fn(log_request))
/// ```
pub async fn log_request(mut request: Request, next: Next) -> Response<Body> {
    let start = Instant::now();
    let trace_id = TraceId::from_request(&request);

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    request.extensions_mut().insert(trace_id.clone());

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        path = %path,
    );
    let mut response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);
    log_completion(&trace_id, status, &duration_ms);

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        let headers = response.headers_mut();
        headers.insert(TRACE_ID_HEADER, value.clone());
        headers.insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn log_completion(trace_id: &TraceId, status: StatusCode, duration_ms: &str) {
    let status_code = status.as_u16();

    if status.is_server_error() {
        tracing::error!(trace_id = %trace_id, status = status_code, duration_ms, "Server error");
    } else if status.is_client_error() {
        tracing::warn!(trace_id = %trace_id, status = status_code, duration_ms, "Client error");
    } else {
        tracing::info!(trace_id = %trace_id, status = status_code, duration_ms, "Request completed");
    }
}
