//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 通用错误 | E0003 资源不存在 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E4xxx | 订单错误 | E4001 非法状态迁移 |
//! | E6xxx | 商品/库存错误 | E6001 库存不足 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Order 42"))
//!
//! // 库存不足（400，携带商品 slug）
//! Err(AppError::insufficient_stock("red-hoodie"))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 未登录、令牌过期、无效令牌 |
/// | 业务逻辑错误 | 资源不存在、验证失败、库存不足、非法状态迁移 |
/// | 系统错误 | 数据库错误、内部错误 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌过期 (401)
    TokenExpired,

    #[error("Invalid token: {0}")]
    /// 无效令牌 (401)
    InvalidToken(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在或不属于当前客户 (404)
    NotFound(String),

    #[error("Product '{0}' not found")]
    /// 商品不存在 (404)
    ProductNotFound(String),

    #[error("You do not have any orders.")]
    /// 客户尚无任何订单 (404)，与认证失败显式区分
    NoOrders,

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Not enough stock for product '{0}'")]
    /// 库存不足 (400)
    InsufficientStock(String),

    #[error("Invalid quantity: {0}")]
    /// 数量非法，必须 >= 1 (400)
    InvalidQuantity(i64),

    #[error("Order is already {0}, no further transition allowed")]
    /// 订单已处于终态 (400)
    InvalidTransition(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".to_string())
            }
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "E3003", "Token expired".to_string())
            }
            AppError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".to_string())
            }

            // Not found (404): absent and not-owned are indistinguishable
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", format!("{} not found", msg)),
            AppError::ProductNotFound(_) => (StatusCode::NOT_FOUND, "E6003", self.to_string()),
            AppError::NoOrders => (StatusCode::NOT_FOUND, "E4002", self.to_string()),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::InsufficientStock(_) => (StatusCode::BAD_REQUEST, "E6001", self.to_string()),
            AppError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, "E6002", self.to_string()),
            AppError::InvalidTransition(_) => (StatusCode::BAD_REQUEST, "E4001", self.to_string()),

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error".to_string())
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    /// Create a NotFound error ("{resource} not found" in the response body)
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a ProductNotFound error from a slug
    pub fn product_not_found(slug: impl Into<String>) -> Self {
        Self::ProductNotFound(slug.into())
    }

    /// Create a Validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an InsufficientStock error from a slug
    pub fn insufficient_stock(slug: impl Into<String>) -> Self {
        Self::InsufficientStock(slug.into())
    }

    /// Create an InvalidTransition error from the current status
    pub fn invalid_transition(status: impl std::fmt::Display) -> Self {
        Self::InvalidTransition(status.to_string())
    }

    /// Create an InvalidToken error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    /// Create a Database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an Internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Conversions from repository errors ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Application-level Result type used by HTTP handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        let cases = [
            (AppError::not_found("Order 1"), StatusCode::NOT_FOUND),
            (AppError::product_not_found("tee"), StatusCode::NOT_FOUND),
            (AppError::insufficient_stock("tee"), StatusCode::BAD_REQUEST),
            (AppError::InvalidQuantity(0), StatusCode::BAD_REQUEST),
            (AppError::invalid_transition("CANCELLED"), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::database("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
