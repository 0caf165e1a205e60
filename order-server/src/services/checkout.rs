//! Checkout workflow - stock reconciliation
//!
//! Converts requested (product, quantity) lines into committed order rows
//! with reserved stock. The whole call runs in one SQLite transaction:
//! every reservation and every order row either commits together or rolls
//! back together, so a failure on line N leaves lines 1..N-1 untouched.
//!
//! Reference data (address, product rows) is resolved through the pool
//! before the transaction opens; the first statement inside the
//! transaction is always a guarded UPDATE. Under WAL that takes the write
//! lock with a fresh snapshot, so concurrent checkouts on the same product
//! serialize on the stock counter instead of failing with a stale-snapshot
//! busy error.
//!
//! # Flow
//!
//! ```text
//! place_order(req)
//!     ├─ 1. Resolve lines (explicit list, or the customer's cart)
//!     ├─ 2. Validate quantities (before touching the store)
//!     ├─ 3. Resolve address and every product (pool reads)
//!     ├─ 4. BEGIN
//!     │     ├─ per line: reserve stock (guarded UPDATE) → insert order
//!     │     └─ cart-sourced? clear drawn cart rows
//!     ├─ 5. COMMIT (any failure above drops the transaction)
//!     └─ 6. Spawn best-effort invoice generation per order
//! ```

use sqlx::SqlitePool;

use crate::auth::CurrentCustomer;
use crate::db::repository::{address, cart, order, product};
use crate::invoicing::InvoiceService;
use crate::utils::{AppError, AppResult};
use shared::models::{CheckoutLine, CheckoutRequest, Order, OrderStatus, Product};

/// Place an order for the requested lines
///
/// All-or-nothing across the whole list; returns every created order row
/// on success.
pub async fn place_order(
    pool: &SqlitePool,
    customer: &CurrentCustomer,
    req: CheckoutRequest,
) -> AppResult<Vec<Order>> {
    let from_cart = req.items.is_empty();
    let lines = if from_cart {
        cart_lines(pool, customer).await?
    } else {
        req.items
    };

    if lines.is_empty() {
        return Err(AppError::validation("No items to check out"));
    }
    for line in &lines {
        if line.quantity <= 0 {
            return Err(AppError::InvalidQuantity(line.quantity));
        }
    }

    // 地址缺失则整单失败，不做任何部分处理
    let address = address::find_by_id(pool, req.address_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Address {}", req.address_id)))?;

    // Resolve every product up front; the slugs decide the error, the
    // guarded UPDATE inside the transaction decides availability
    let mut resolved: Vec<(Product, i64)> = Vec::with_capacity(lines.len());
    for line in &lines {
        let prod = product::find_by_slug(pool, &line.slug)
            .await?
            .ok_or_else(|| AppError::product_not_found(&line.slug))?;
        resolved.push((prod, line.quantity));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let mut created = Vec::with_capacity(resolved.len());
    for (prod, quantity) in &resolved {
        // 检查与扣减是同一条带守卫的 UPDATE；失败时事务丢弃，
        // 本次调用之前预留的库存和已建订单行全部回滚
        if !product::reserve_stock(&mut tx, prod.id, *quantity).await? {
            return Err(AppError::insufficient_stock(&prod.slug));
        }

        let created_order = order::create_tx(&mut tx, customer, address.id, prod, *quantity).await?;
        created.push(created_order);
    }

    if from_cart {
        cart::clear_for_customer_tx(&mut tx, &customer.id).await?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        customer_id = %customer.id,
        orders = created.len(),
        "Checkout committed"
    );

    Ok(created)
}

/// Place an order and trigger invoice generation for each created row
///
/// Invoice generation is best-effort: it runs outside the checkout
/// transaction and a failure is logged, never surfaced to the caller.
pub async fn place_order_with_invoices(
    pool: &SqlitePool,
    invoices: &InvoiceService,
    customer: &CurrentCustomer,
    req: CheckoutRequest,
) -> AppResult<Vec<Order>> {
    let created = place_order(pool, customer, req).await?;

    for o in &created {
        let invoices = invoices.clone();
        let customer = customer.clone();
        let order_id = o.id;
        tokio::spawn(async move {
            if let Err(e) = invoices.get_or_generate(order_id, &customer).await {
                tracing::warn!(
                    order_id,
                    error = %e,
                    "Eager invoice generation failed; will retry on first request"
                );
            }
        });
    }

    Ok(created)
}

/// Cancel a placed order and restore its stock, atomically
///
/// Terminal orders (DELIVERED, CANCELLED) reject the transition; the second
/// cancel of the same order therefore fails and stock is restored exactly
/// once. The transition UPDATE carries a status guard, so even two
/// concurrent cancels of one order release the stock only once.
pub async fn cancel_order(
    pool: &SqlitePool,
    customer: &CurrentCustomer,
    order_id: i64,
) -> AppResult<Order> {
    let existing = order::find_by_id_for_customer(pool, &customer.id, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    if existing.status.is_terminal() {
        return Err(AppError::invalid_transition(existing.status));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // First statement in the transaction; rows_affected == 0 means the
    // order moved concurrently since the read above
    if !order::set_status_tx(&mut tx, order_id, existing.status, OrderStatus::Cancelled).await? {
        return Err(AppError::invalid_transition(existing.status));
    }
    product::release_stock(&mut tx, existing.product_id, existing.quantity).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        order_id,
        customer_id = %customer.id,
        quantity = existing.quantity,
        "Order cancelled, stock restored"
    );

    order::find_by_id_for_customer(pool, &customer.id, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
}

/// Draw checkout lines from the customer's cart
async fn cart_lines(pool: &SqlitePool, customer: &CurrentCustomer) -> AppResult<Vec<CheckoutLine>> {
    let items = cart::find_all_by_customer(pool, &customer.id).await?;
    Ok(items
        .into_iter()
        .map(|item| CheckoutLine {
            slug: item.slug,
            quantity: item.quantity,
        })
        .collect())
}
