//! Order API 模块
//!
//! 下单、查询、取消与发票获取。所有路由要求客户身份（Bearer JWT）。

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", patch(handler::cancel))
        .route("/{id}/invoice", get(handler::invoice))
}
