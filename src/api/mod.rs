//! API endpoint handlers module

pub mod health;
pub mod sql;
