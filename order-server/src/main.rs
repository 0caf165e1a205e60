use order_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(None, log_dir.to_str());

    tracing::info!("Storefront order server starting...");

    // 2. 初始化服务器状态 (数据库、JWT、发票服务)
    let state = ServerState::initialize(&config).await?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
