//! Natural-language to SQL generation
//!
//! Resolves an LLM provider (OpenAI, or Anthropic models on AWS Bedrock) from
//! the credentials present in the environment, prompts it with the dataset
//! schema and the user's question, and returns a single SQL statement.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::{ApiError, GenerationError};
pub use schemas::{GenerationRequest, GenerationResult, ProviderKind};
pub use server::App;
pub use services::SqlGenerator;
