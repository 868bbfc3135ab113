//! Schema module
//!
//! Request/response models for the SQL generation API and the OpenAI wire format.

pub mod openai;
pub mod sql;

pub use sql::{
    ColumnSchema, GenerationRequest, GenerationResult, ProviderKind, SchemaDescription,
    TableSchema,
};
