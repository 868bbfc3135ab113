//! AWS SDK configuration
//!
//! Builds Bedrock Runtime clients from an explicit credential tuple. The
//! SDK's default credential and region chains are never loaded here: the
//! `SdkConfig` is assembled by hand so a missing key fails before any call.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::{provider::SharedCredentialsProvider, Credentials};
use aws_sdk_bedrockruntime::Client as BedrockRuntimeClient;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types::timeout::TimeoutConfig;

use crate::config::Settings;
use crate::services::credentials::BedrockCredentials;

/// Provider name recorded on the static credentials
const CREDENTIALS_SOURCE: &str = "nl2sql-environment";

/// AWS configuration builder
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
    credentials: &'a BedrockCredentials,
}

impl<'a> AwsConfigBuilder<'a> {
    pub fn new(settings: &'a Settings, credentials: &'a BedrockCredentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    /// Build the base AWS SDK configuration
    ///
    /// Region, static credentials and the operation timeout all come from
    /// the caller; nothing is discovered from profiles or instance metadata.
    /// SDK retries are disabled: one invocation is one HTTP attempt.
    pub fn build_sdk_config(&self) -> SdkConfig {
        let credentials = Credentials::new(
            self.credentials.access_key_id.clone(),
            self.credentials.secret_access_key.clone(),
            self.credentials.session_token.clone(),
            None,
            CREDENTIALS_SOURCE,
        );

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(self.settings.llm.request_timeout())
            .build();

        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.credentials.region.clone()))
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .timeout_config(timeout_config)
            .retry_config(RetryConfig::disabled())
            .build()
    }

    /// Create a Bedrock Runtime client with optional custom endpoint
    ///
    /// If `BEDROCK_ENDPOINT_URL` is set in settings, the client will use
    /// that endpoint (useful for testing with mocks).
    pub fn build_bedrock_client(&self) -> BedrockRuntimeClient {
        let sdk_config = self.build_sdk_config();

        if let Some(endpoint_url) = &self.settings.bedrock_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom Bedrock endpoint");

            let bedrock_config = aws_sdk_bedrockruntime::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            BedrockRuntimeClient::from_conf(bedrock_config)
        } else {
            BedrockRuntimeClient::new(&sdk_config)
        }
    }
}

/// Create a Bedrock Runtime client from settings and explicit credentials
pub fn create_bedrock_client(
    settings: &Settings,
    credentials: &BedrockCredentials,
) -> BedrockRuntimeClient {
    AwsConfigBuilder::new(settings, credentials).build_bedrock_client()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::ProvideCredentials;

    fn test_credentials() -> BedrockCredentials {
        BedrockCredentials {
            access_key_id: "AKIATESTACCESSKEY".to_string(),
            secret_access_key: "test-secret-access-key".to_string(),
            region: "eu-west-3".to_string(),
            session_token: Some("session-token".to_string()),
        }
    }

    #[test]
    fn test_sdk_config_uses_explicit_region_and_timeout() {
        let settings = Settings::default();
        let credentials = test_credentials();
        let config = AwsConfigBuilder::new(&settings, &credentials).build_sdk_config();

        assert_eq!(config.region().unwrap().as_ref(), "eu-west-3");
        assert_eq!(
            config.timeout_config().unwrap().operation_timeout(),
            Some(settings.llm.request_timeout())
        );
    }

    #[test]
    fn test_sdk_config_disables_retries() {
        let settings = Settings::default();
        let credentials = test_credentials();
        let config = AwsConfigBuilder::new(&settings, &credentials).build_sdk_config();

        assert_eq!(config.retry_config().unwrap().max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_sdk_config_uses_explicit_credentials() {
        let settings = Settings::default();
        let credentials = test_credentials();
        let config = AwsConfigBuilder::new(&settings, &credentials).build_sdk_config();

        let provided = config
            .credentials_provider()
            .expect("credentials provider should be set")
            .provide_credentials()
            .await
            .unwrap();

        assert_eq!(provided.access_key_id(), "AKIATESTACCESSKEY");
        assert_eq!(provided.secret_access_key(), "test-secret-access-key");
        assert_eq!(provided.session_token(), Some("session-token"));
    }

    #[test]
    fn test_bedrock_client_creation() {
        let settings = Settings::default();
        let _client = create_bedrock_client(&settings, &test_credentials());
    }

    #[test]
    fn test_custom_endpoint_bedrock() {
        let mut settings = Settings::default();
        settings.bedrock_endpoint_url = Some("http://localhost:8001".to_string());

        let _client = create_bedrock_client(&settings, &test_credentials());
    }
}
