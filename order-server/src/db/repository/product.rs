//! Product Repository - catalog reads and the inventory ledger
//!
//! Catalog CRUD lives in an external system; this module reads product rows
//! and owns the stock counter. `reserve_stock`/`release_stock` mutate the
//! counter and always run inside the caller's transaction.

use super::RepoResult;
use shared::models::{Product, ProductCreate};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, slug, name, price, discount_price, stock, is_active, created_at, updated_at FROM product";

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE slug = ? AND is_active = 1", PRODUCT_SELECT);
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{} WHERE id = ?", PRODUCT_SELECT);
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// Atomically reserve stock: decrement only when enough units remain.
///
/// The availability check and the decrement are one guarded UPDATE, so two
/// concurrent reservations can never both observe the last unit. Returns
/// `false` (row untouched) when stock is insufficient.
pub async fn reserve_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Return previously reserved units to stock (cancellation, compensation)
pub async fn release_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE product SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(now)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Seed a product row (provisioning and tests; no HTTP surface)
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, slug, name, price, discount_price, stock, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.slug)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.discount_price)
    .bind(data.stock)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create product".into()))
}
