//! Order Model
//!
//! Orders are the system of record: one row per (product, quantity) line.
//! Soft lifecycle only; cancellation is a status transition, never a delete.

use serde::{Deserialize, Serialize};

/// Order status lifecycle
///
/// | 状态 | 含义 | 终态 |
/// |------|------|------|
/// | PLACED | 已下单（库存已扣减） | 否 |
/// | SHIPPED | 已发货 | 否 |
/// | DELIVERED | 已送达 | 是 |
/// | CANCELLED | 已取消（库存已回补） | 是 |
///
/// The only transition this server drives is PLACED → CANCELLED; the
/// fulfillment states are written by external systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum OrderStatus {
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Order entity
///
/// `quantity` and `final_price` are fixed at creation; only `status`
/// changes afterwards. Customer display fields are snapshotted onto the
/// row because identity lives in an external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub address_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// quantity × discount_price, computed once at creation
    pub final_price: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order with product info (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithProduct {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub address_id: i64,
    pub product_id: i64,
    pub slug: String,
    pub product_name: String,
    pub quantity: i64,
    pub final_price: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One requested checkout line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub slug: String,
    pub quantity: i64,
}

/// Checkout payload
///
/// When `items` is empty the lines are drawn from the customer's cart and
/// the drawn cart rows are cleared on success; an explicit list bypasses
/// the cart entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub address_id: i64,
    #[serde(default)]
    pub items: Vec<CheckoutLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Placed.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&OrderStatus::Placed).unwrap();
        assert_eq!(json, "\"PLACED\"");
        let back: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_checkout_request_items_default_empty() {
        let req: CheckoutRequest = serde_json::from_str(r#"{"address_id": 7}"#).unwrap();
        assert_eq!(req.address_id, 7);
        assert!(req.items.is_empty());
    }
}
