//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{health, sql};
use crate::middleware::logging::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/liveness", get(health::liveness));

    let api_routes = Router::new()
        .route("/sql/generate", post(sql::generate_sql))
        .route("/providers", get(health::providers));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(create_cors_layer())
        // Custom request logging with trace IDs
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create CORS layer with permissive settings for the frontend dev server
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::schemas::ProviderKind;
    use crate::server::state::EnvSource;
    use crate::services::credentials::{AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY};
    use crate::services::{
        ChatProvider, EnvSnapshot, InferenceParams, ProviderCallError, ProviderCredentials,
        ProviderFactory, SqlGenerator, SqlPrompt,
    };
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FencedReply;

    #[async_trait]
    impl ChatProvider for FencedReply {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Bedrock
        }

        async fn send_chat(
            &self,
            _prompt: &SqlPrompt,
            _model: &str,
            _params: &InferenceParams,
        ) -> Result<String, ProviderCallError> {
            Ok("```sql\nSELECT COUNT(*) FROM users;\n```".to_string())
        }
    }

    struct FencedFactory;

    impl ProviderFactory for FencedFactory {
        fn build(
            &self,
            _credentials: &ProviderCredentials,
        ) -> Result<Arc<dyn ChatProvider>, ProviderCallError> {
            Ok(Arc::new(FencedReply))
        }
    }

    fn router(env: EnvSnapshot) -> Router {
        let settings = Arc::new(Settings::default());
        let generator = Arc::new(SqlGenerator::new(settings.clone(), Arc::new(FencedFactory)));
        create_router(AppState::with_generator(
            settings,
            generator,
            EnvSource::Fixed(Arc::new(env)),
        ))
    }

    fn bedrock_env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([
            (AWS_ACCESS_KEY_ID, "AKIATESTACCESSKEY"),
            (AWS_SECRET_ACCESS_KEY, "test-secret-access-key"),
        ])
    }

    fn generate_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/sql/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sql_success() {
        let body = json!({
            "question": "How many users are there?",
            "schema": {"tables": [{"name": "users", "columns": [{"name": "id", "type": "INTEGER"}]}]}
        });

        let response = router(bedrock_env())
            .oneshot(generate_request(&body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));

        let value = json_body(response).await;
        assert_eq!(value["sql"], "SELECT COUNT(*) FROM users;");
        assert_eq!(value["provider"], "anthropic");
    }

    #[tokio::test]
    async fn test_generate_sql_without_providers() {
        let response = router(EnvSnapshot::default())
            .oneshot(generate_request(r#"{"question": "How many users?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let value = json_body(response).await;
        assert_eq!(value["error"]["kind"], "NoProviderAvailable");
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_generate_sql_malformed_body() {
        let response = router(bedrock_env())
            .oneshot(generate_request(r#"{"schema": {}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = json_body(response).await;
        assert_eq!(value["error"]["kind"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_generate_sql_empty_question() {
        let response = router(bedrock_env())
            .oneshot(generate_request(r#"{"question": "  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_providers_endpoint() {
        let response = router(bedrock_env())
            .oneshot(
                Request::builder()
                    .uri("/api/providers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert_eq!(value["default_provider"], "anthropic");
        assert_eq!(value["providers"][0]["provider"], "openai");
        assert_eq!(value["providers"][0]["available"], false);
        assert_eq!(value["providers"][1]["available"], true);
        assert!(!value.to_string().contains("test-secret-access-key"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = router(EnvSnapshot::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value["status"], "healthy");
    }
}
