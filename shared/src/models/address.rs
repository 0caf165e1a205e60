//! Address Model

use serde::{Deserialize, Serialize};

/// Delivery address (地址簿由外部服务管理，这里只读)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Address {
    pub id: i64,
    pub customer_id: String,
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub created_at: i64,
}

/// Seed/create payload (used by provisioning and tests, not exposed over HTTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCreate {
    pub customer_id: String,
    pub recipient: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}
