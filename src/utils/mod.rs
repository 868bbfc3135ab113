//! Utility modules

pub mod text;

pub use text::{normalize_sql, truncate_with_suffix};
