//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口（下单、取消、发票）

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub mod cart;
pub mod health;
pub mod orders;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Cart API - authenticated via extractor
        .merge(cart::router())
        // Orders API - authenticated via extractor
        .merge(orders::router())
}

/// Build a fully configured application with middleware and state
pub fn app(state: ServerState) -> Router {
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
