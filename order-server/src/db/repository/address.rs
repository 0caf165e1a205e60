//! Address Repository
//!
//! Address-book management is external; checkout only resolves an address
//! by identifier.

use super::{RepoError, RepoResult};
use shared::models::{Address, AddressCreate};
use sqlx::SqlitePool;

const ADDRESS_SELECT: &str = "SELECT id, customer_id, recipient, street, city, postal_code, country, created_at FROM address";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Address>> {
    let sql = format!("{} WHERE id = ?", ADDRESS_SELECT);
    let address = sqlx::query_as::<_, Address>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(address)
}

/// Seed an address row (provisioning and tests; no HTTP surface)
pub async fn create(pool: &SqlitePool, data: AddressCreate) -> RepoResult<Address> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO address (id, customer_id, recipient, street, city, postal_code, country, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(&data.customer_id)
    .bind(&data.recipient)
    .bind(&data.street)
    .bind(&data.city)
    .bind(&data.postal_code)
    .bind(&data.country)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create address".into()))
}
