//! Shared types for the storefront order backend
//!
//! Domain models and small utilities used by the order server and its
//! integration tests. DB row types derive `sqlx::FromRow` behind the
//! optional `db` feature so pure clients stay free of sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
