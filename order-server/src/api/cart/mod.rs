//! Cart API 模块
//!
//! 购物车 CRUD，全部以当前客户为作用域。

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", patch(handler::update).delete(handler::remove))
}
