//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::auth::CurrentCustomer;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::services::checkout;
use crate::utils::{AppError, AppResult};
use shared::models::{CheckoutRequest, Order, OrderWithProduct};

/// GET /api/orders - 获取当前客户的订单
///
/// 空结果返回 404（区别于认证失败），而不是空数组。
pub async fn list(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
) -> AppResult<Json<Vec<OrderWithProduct>>> {
    let orders = order::find_all_by_customer(&state.pool, &customer.id).await?;
    if orders.is_empty() {
        return Err(AppError::NoOrders);
    }
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order_row = order::find_by_id_for_customer(&state.pool, &customer.id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order_row))
}

/// POST /api/orders - 下单（结算）
///
/// 整个请求在一个事务内结算；任一行失败则全部回滚。
/// 成功后为每个订单行触发 best-effort 发票生成。
pub async fn create(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    let orders =
        checkout::place_order_with_invoices(&state.pool, &state.invoices, &customer, payload)
            .await?;
    Ok((StatusCode::CREATED, Json(orders)))
}

/// PATCH /api/orders/:id/cancel - 取消订单并回补库存
pub async fn cancel(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order_row = checkout::cancel_order(&state.pool, &customer, id).await?;
    Ok(Json(order_row))
}

/// GET /api/orders/:id/invoice - 获取发票 PDF
///
/// 永远返回 200 + PDF 字节流：订单不存在（或不属于当前客户）时
/// 返回默认占位发票。
pub async fn invoice(
    State(state): State<ServerState>,
    customer: CurrentCustomer,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.invoices.get_or_generate(id, &customer).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        bytes,
    ))
}
