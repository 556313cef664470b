use std::{path::Path, str::FromStr, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

/// 数据库连接池类型
pub type DBPool = sqlx::SqlitePool;

/// 建表语句
const SCHEMA: &str = include_str!("../../sql/01-CREATE_TABLE.sql");

/// 内存数据库的路径标记
pub const MEMORY_DB: &str = ":memory:";

/// 根据数据库文件路径创建新的连接池
///
/// 连接池配置：
///
/// - 文件不存在时自动创建（包括父目录）
/// - WAL 日志模式，启用外键约束
/// - 最大连接数 5，获取连接超时 5 秒
/// - 路径为 [`MEMORY_DB`] 时只保留一个常驻连接，所有请求共享同一个内存库
pub async fn new_db_pool(path: impl AsRef<Path>) -> Result<DBPool, sqlx::Error> {
    let path = path.as_ref();

    if path.as_os_str() == MEMORY_DB {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}

/// 执行建表语句
///
/// 语句按 `;` 分割，每条单独执行；全部使用 `IF NOT EXISTS`，可重复执行
pub async fn migrate(db: &DBPool) -> Result<(), sqlx::Error> {
    for sql in SCHEMA.split(';') {
        if sql.trim().is_empty() {
            continue;
        }
        sqlx::query(sql).execute(db).await?;
    }
    Ok(())
}
