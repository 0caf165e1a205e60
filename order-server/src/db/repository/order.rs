//! Order Repository - the system of record
//!
//! Creation happens only inside the checkout transaction; afterwards a row
//! never changes except its status, and it is never deleted. Absent and
//! not-owned rows are indistinguishable to callers so order IDs cannot be
//! probed.

use super::{RepoError, RepoResult};
use crate::auth::CurrentCustomer;
use shared::models::{Order, OrderStatus, OrderWithProduct, Product};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, customer_id, customer_name, customer_email, address_id, product_id, quantity, final_price, status, created_at, updated_at FROM customer_order";

const ORDER_WITH_PRODUCT_SELECT: &str = "SELECT o.id, o.customer_id, o.customer_name, o.customer_email, o.address_id, o.product_id, p.slug, p.name as product_name, o.quantity, o.final_price, o.status, o.created_at, o.updated_at FROM customer_order o JOIN product p ON o.product_id = p.id";

/// Create one order line inside the checkout transaction
///
/// Pure record creation: `final_price = quantity × discount_price` is fixed
/// here and never recomputed. Stock checks are the checkout workflow's job.
pub async fn create_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    customer: &CurrentCustomer,
    address_id: i64,
    product: &Product,
    quantity: i64,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let final_price = product.discount_price * quantity as f64;

    sqlx::query(
        "INSERT INTO customer_order (id, customer_id, customer_name, customer_email, address_id, product_id, quantity, final_price, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&customer.id)
    .bind(&customer.display_name)
    .bind(&customer.email)
    .bind(address_id)
    .bind(product.id)
    .bind(quantity)
    .bind(final_price)
    .bind(OrderStatus::Placed)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    let sql = format!("{} WHERE id = ?", ORDER_SELECT);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    order.ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn find_all_by_customer(
    pool: &SqlitePool,
    customer_id: &str,
) -> RepoResult<Vec<OrderWithProduct>> {
    let sql = format!(
        "{} WHERE o.customer_id = ? ORDER BY o.created_at DESC",
        ORDER_WITH_PRODUCT_SELECT
    );
    let rows = sqlx::query_as::<_, OrderWithProduct>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id_for_customer(
    pool: &SqlitePool,
    customer_id: &str,
    id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ? AND customer_id = ?", ORDER_SELECT);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Transition an order's status inside an open transaction
///
/// The guard on the current status keeps terminal orders frozen even when
/// two transitions race on the same row: the loser sees `false` and must
/// not apply its compensations.
pub async fn set_status_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer_order SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}
