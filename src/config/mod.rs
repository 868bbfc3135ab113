//! Configuration management module
//!
//! This module handles loading and validating application configuration
//! from environment variables and .env files, and building AWS clients.

pub mod aws;
pub mod settings;

pub use aws::{create_bedrock_client, AwsConfigBuilder};
pub use settings::{Environment, LlmConfig, Settings};
