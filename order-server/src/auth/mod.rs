//! 认证模块
//!
//! 身份由外部认证服务签发；本服务只消费请求携带的 Bearer JWT：
//! - [`JwtService`] - JWT 令牌校验服务
//! - [`CurrentCustomer`] - 当前客户上下文（通过提取器注入）

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentCustomer, JwtConfig, JwtError, JwtService};
