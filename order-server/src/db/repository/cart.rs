//! Cart Repository
//!
//! Every lookup is keyed by (customer_id, ...): a cart row is invisible to
//! any customer other than its owner.

use super::{RepoError, RepoResult};
use shared::models::{CartItem, CartItemWithProduct};
use sqlx::SqlitePool;

const CART_WITH_PRODUCT_SELECT: &str = "SELECT c.id, c.customer_id, c.product_id, p.slug, p.name as product_name, p.price, p.discount_price, p.stock, c.quantity, c.created_at, c.updated_at FROM cart_item c JOIN product p ON c.product_id = p.id";

pub async fn find_all_by_customer(
    pool: &SqlitePool,
    customer_id: &str,
) -> RepoResult<Vec<CartItemWithProduct>> {
    let sql = format!(
        "{} WHERE c.customer_id = ? ORDER BY c.created_at",
        CART_WITH_PRODUCT_SELECT
    );
    let rows = sqlx::query_as::<_, CartItemWithProduct>(&sql)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    customer_id: &str,
    id: i64,
) -> RepoResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, customer_id, product_id, quantity, created_at, updated_at FROM cart_item WHERE id = ? AND customer_id = ?",
    )
    .bind(id)
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

/// Set-or-replace the quantity for (customer, product)
///
/// Repeat add overwrites the stored quantity rather than incrementing it.
pub async fn upsert(
    pool: &SqlitePool,
    customer_id: &str,
    product_id: i64,
    quantity: i64,
) -> RepoResult<CartItem> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO cart_item (id, customer_id, product_id, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) ON CONFLICT (customer_id, product_id) DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(customer_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(pool)
    .await?;

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, customer_id, product_id, quantity, created_at, updated_at FROM cart_item WHERE customer_id = ? AND product_id = ?",
    )
    .bind(customer_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    item.ok_or_else(|| RepoError::Database("Failed to upsert cart item".into()))
}

pub async fn update_quantity(
    pool: &SqlitePool,
    customer_id: &str,
    id: i64,
    quantity: i64,
) -> RepoResult<CartItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE cart_item SET quantity = ?1, updated_at = ?2 WHERE id = ?3 AND customer_id = ?4",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .bind(customer_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart item {id}")));
    }
    find_by_id(pool, customer_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cart item {id}")))
}

/// Delete a cart line; repeat deletion reports NotFound
pub async fn delete(pool: &SqlitePool, customer_id: &str, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ? AND customer_id = ?")
        .bind(id)
        .bind(customer_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Clear a customer's cart inside the checkout transaction
pub async fn clear_for_customer_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    customer_id: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE customer_id = ?")
        .bind(customer_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}
