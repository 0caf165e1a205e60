//! Repository Module
//!
//! Data access layer over SQLite. Free functions take the pool (single
//! statements) or an open transaction (multi-row workflows), always keyed
//! by customer identity where the resource is customer-owned.

// Catalog / inventory ledger
pub mod product;

// Address book snapshot
pub mod address;

// Cart store
pub mod cart;

// Order ledger
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
