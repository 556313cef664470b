pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use crate::{
    analyzer::AnalyzerKind,
    config::Config,
    state::AppState,
    storage::{Storage, new_db_pool},
};

/// 启动服务
///
/// 初始化日志，加载配置，打开并初始化数据库，选择分析策略后开始监听。
/// 服务停止后关闭数据库连接池。
pub async fn run() -> error::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("HELPDESK_LOG"))
        .init();

    let config = Config::load()?;

    let pool = new_db_pool(&config.db_path)
        .await
        .map_err(storage::StorageError::from)?;
    pool.initialize().await?;
    tracing::info!(path = %config.db_path.display(), "database ready");

    let analyzer = AnalyzerKind::from_config(&config)?;
    tracing::info!(analyzer = analyzer.name(), "analyzer selected");

    let app = AppState::new(pool.clone(), analyzer, &config.service_name);
    let served = api::run_server(app, &config).await;

    pool.close().await;
    served
}
