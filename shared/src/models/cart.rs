//! Cart Model

use serde::{Deserialize, Serialize};

/// Cart line (会员购物车行), unique per (customer, product)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub customer_id: String,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Add-to-cart payload
///
/// Repeat adds for the same product overwrite the quantity rather than
/// incrementing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    /// Product slug (public catalog handle)
    pub slug: String,
    pub quantity: i64,
}

/// Update payload for an existing cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: i64,
}

/// Cart line with product info (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItemWithProduct {
    pub id: i64,
    pub customer_id: String,
    pub product_id: i64,
    pub slug: String,
    pub product_name: String,
    pub price: f64,
    pub discount_price: f64,
    pub stock: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
