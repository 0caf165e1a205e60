//! Invoice service - cache-first get-or-generate

use std::path::PathBuf;

use sqlx::SqlitePool;

use crate::auth::CurrentCustomer;
use crate::db::repository::{address, order, product};
use crate::invoicing::{InvoiceRenderer, InvoiceSnapshot, InvoiceStore};
use crate::utils::{AppError, AppResult};

/// Invoice generation and caching
///
/// Callers always receive a PDF: an unresolvable order (absent, or owned by
/// another customer, indistinguishable by design) yields the default
/// artifact rather than an error. Store I/O faults stay errors.
#[derive(Clone)]
pub struct InvoiceService {
    store: InvoiceStore,
    renderer: InvoiceRenderer,
    pool: SqlitePool,
}

impl InvoiceService {
    pub fn new(dir: impl Into<PathBuf>, pool: SqlitePool) -> Self {
        Self {
            store: InvoiceStore::new(dir),
            renderer: InvoiceRenderer::new(),
            pool,
        }
    }

    /// Get the persisted artifact for an order, rendering it on first request
    pub async fn get_or_generate(
        &self,
        order_id: i64,
        customer: &CurrentCustomer,
    ) -> AppResult<Vec<u8>> {
        // Ownership gate first: the cache must never leak another
        // customer's artifact through a guessed order id
        let Some(order_row) = order::find_by_id_for_customer(&self.pool, &customer.id, order_id)
            .await?
        else {
            return Ok(self.renderer.render_default());
        };

        if let Some(bytes) = self
            .store
            .get(order_id)
            .await
            .map_err(|e| AppError::internal(format!("Invoice store read failed: {e}")))?
        {
            return Ok(bytes);
        }

        let snapshot = self.load_snapshot(order_row).await?;
        let bytes = self.renderer.render(&snapshot);

        self.store
            .put(order_id, &bytes)
            .await
            .map_err(|e| AppError::internal(format!("Invoice store write failed: {e}")))?;

        tracing::info!(order_id, "Invoice rendered and persisted");

        Ok(bytes)
    }

    /// Assemble the immutable rendering input for an order
    async fn load_snapshot(&self, order_row: shared::models::Order) -> AppResult<InvoiceSnapshot> {
        let product_row = product::find_by_id(&self.pool, order_row.product_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Order {} references missing product {}",
                    order_row.id, order_row.product_id
                ))
            })?;
        let address_row = address::find_by_id(&self.pool, order_row.address_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Order {} references missing address {}",
                    order_row.id, order_row.address_id
                ))
            })?;

        Ok(InvoiceSnapshot {
            order: order_row,
            product: product_row,
            address: address_row,
        })
    }
}
