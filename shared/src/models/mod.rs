//! Data models
//!
//! Shared between order-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); customer IDs come from
//! the external identity provider and stay `String`.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;

// Re-exports
pub use address::*;
pub use cart::*;
pub use order::*;
pub use product::*;
