use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::invoicing::InvoiceService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是订单服务的核心数据结构。使用 Arc/连接池实现浅拷贝，
/// 每个请求处理器克隆一份的成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 (WAL) |
/// | jwt_service | Arc<JwtService> | JWT 校验服务 |
/// | invoices | InvoiceService | 发票生成与缓存 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 校验服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 发票服务
    pub invoices: InvoiceService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (database/, invoices/, logs/)
    /// 2. 数据库 (work_dir/database/orders.db，自动迁移)
    /// 3. JWT 校验服务
    /// 4. 发票服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("orders.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::new(&config.jwt));
        let invoices = InvoiceService::new(config.invoice_dir(), db_service.pool.clone());

        Ok(Self {
            config: config.clone(),
            pool: db_service.pool,
            jwt_service,
            invoices,
        })
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
