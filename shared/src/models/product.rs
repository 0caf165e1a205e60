//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (catalog row, referenced by carts and orders)
///
/// The catalog itself is managed elsewhere; the order server only reads
/// product rows and mutates `stock` through the inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    /// URL-safe unique handle, the public identifier used by carts/checkout
    pub slug: String,
    pub name: String,
    /// List price
    pub price: f64,
    /// Effective sale price; order lines are priced from this
    pub discount_price: f64,
    /// Units on hand, never negative
    pub stock: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Seed/create payload (used by provisioning and tests, not exposed over HTTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub slug: String,
    pub name: String,
    pub price: f64,
    pub discount_price: f64,
    pub stock: i64,
}
