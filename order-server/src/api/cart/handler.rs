//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::db::repository::{cart, product};
use crate::utils::{AppError, AppResult};
use shared::models::{CartItem, CartItemCreate, CartItemUpdate, CartItemWithProduct};

/// GET /api/cart - 获取当前客户的购物车
pub async fn list(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> AppResult<Json<Vec<CartItemWithProduct>>> {
    let items = cart::find_all_by_customer(&state.pool, &customer.id).await?;
    Ok(Json(items))
}

/// POST /api/cart - 加入购物车
///
/// 同一商品重复加入时覆盖数量而非累加；数量必须 >= 1，
/// 数量为 0 是拒绝而不是删除。
pub async fn create(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<impl IntoResponse> {
    if payload.quantity <= 0 {
        return Err(AppError::InvalidQuantity(payload.quantity));
    }

    let prod = product::find_by_slug(&state.pool, &payload.slug)
        .await?
        .ok_or_else(|| AppError::product_not_found(&payload.slug))?;

    // 加购时的可用量检查是建议性的；下单时才真正预留
    if payload.quantity > prod.stock {
        return Err(AppError::insufficient_stock(&payload.slug));
    }

    let item = cart::upsert(&state.pool, &customer.id, prod.id, payload.quantity).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/cart/:id - 修改购物车行数量
pub async fn update(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<i64>,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::InvalidQuantity(payload.quantity));
    }

    let item = cart::update_quantity(&state.pool, &customer.id, id, payload.quantity).await?;
    Ok(Json(item))
}

/// DELETE /api/cart/:id - 删除购物车行
///
/// 重复删除返回 404 而不是崩溃。
pub async fn remove(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let deleted = cart::delete(&state.pool, &customer.id, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Cart item {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
