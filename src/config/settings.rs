//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.
//! Provider credentials are not part of `Settings`; they are
//! read per request by the credential resolver.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Inference parameters shared by every provider call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Upper bound on generated tokens
    pub max_tokens: i32,
    /// Low temperature keeps SQL output close to deterministic
    pub temperature: f32,
    /// Per-call timeout for provider requests
    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.1,
            request_timeout_seconds: 30,
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // Provider call settings
    pub llm: LlmConfig,

    /// Base URL for the OpenAI API (OpenAI-compatible servers, mocks)
    pub openai_base_url: Option<String>,

    /// Custom Bedrock Runtime endpoint (testing with mocks)
    pub bedrock_endpoint_url: Option<String>,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup, then validate them
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let settings = Self {
            // App settings
            app_name: var("APP_NAME", "nl2sql-service"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: var("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: var("LOG_LEVEL", "info"),

            // Server settings
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8000").parse().context("Invalid PORT value")?,

            // Provider call settings
            llm: LlmConfig {
                max_tokens: var("LLM_MAX_TOKENS", "500")
                    .parse()
                    .context("Invalid LLM_MAX_TOKENS value")?,
                temperature: var("LLM_TEMPERATURE", "0.1")
                    .parse()
                    .context("Invalid LLM_TEMPERATURE value")?,
                request_timeout_seconds: var("LLM_REQUEST_TIMEOUT_SECONDS", "30")
                    .parse()
                    .context("Invalid LLM_REQUEST_TIMEOUT_SECONDS value")?,
            },

            openai_base_url: non_empty("OPENAI_BASE_URL"),
            bedrock_endpoint_url: non_empty("BEDROCK_ENDPOINT_URL"),
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.llm.max_tokens <= 0 {
            anyhow::bail!("LLM max_tokens must be > 0");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!("LLM temperature must be between 0.0 and 2.0");
        }
        if self.llm.request_timeout_seconds == 0 {
            anyhow::bail!("LLM request timeout must be > 0");
        }

        Ok(())
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "nl2sql-service".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            llm: LlmConfig::default(),
            openai_base_url: None,
            bedrock_endpoint_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.app_name, "nl2sql-service");
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.llm.max_tokens, 500);
        assert_eq!(settings.llm.request_timeout(), Duration::from_secs(30));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_inference_params() {
        let mut settings = Settings::default();
        settings.llm.temperature = 3.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.max_tokens = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.request_timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("LLM_REQUEST_TIMEOUT_SECONDS", "5"),
            ("OPENAI_BASE_URL", "  "),
            ("BEDROCK_ENDPOINT_URL", "http://localhost:8001"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.llm.request_timeout_seconds, 5);
        assert_eq!(settings.openai_base_url, None);
        assert_eq!(settings.bedrock_endpoint_url.as_deref(), Some("http://localhost:8001"));
    }

    #[test]
    fn test_malformed_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("LLM_REQUEST_TIMEOUT_SECONDS", "thirty")]))
            .unwrap_err();
        assert!(err.to_string().contains("LLM_REQUEST_TIMEOUT_SECONDS"));

        let err = Settings::from_lookup(lookup(&[("LLM_REQUEST_TIMEOUT_SECONDS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
    }
}
