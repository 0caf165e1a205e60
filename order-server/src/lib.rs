//! Storefront Order Server - 电商订单核心服务
//!
//! # 架构概述
//!
//! 本模块是订单服务的主入口，提供以下核心功能：
//!
//! - **下单工作流** (`services::checkout`): 单事务内的库存预留 + 订单创建，整单回滚
//! - **数据库** (`db`): SQLite (WAL) 连接池、迁移与仓储层
//! - **认证** (`auth`): 校验外部签发的客户 JWT
//! - **发票** (`invoicing`): 订单快照渲染 PDF，一次写入缓存
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 校验、客户上下文
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 下单/取消工作流
//! ├── invoicing/     # 发票渲染与存储
//! ├── utils/         # 错误、日志
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod invoicing;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentCustomer, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
