//! Invoicing data types

use shared::models::{Address, Order, Product};

/// Immutable rendering input for one invoice
///
/// Assembled once from the order row and its referenced product and address;
/// the customer display fields were snapshotted onto the order at creation,
/// so rendering the same snapshot always yields the same bytes.
#[derive(Debug, Clone)]
pub struct InvoiceSnapshot {
    pub order: Order,
    pub product: Product,
    pub address: Address,
}
