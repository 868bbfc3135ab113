//! Error types

pub mod generation;
pub mod types;

pub use generation::GenerationError;
pub use types::ApiError;
