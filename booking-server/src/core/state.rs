//! 服务器状态 - 持有所有共享服务的引用

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::{AppError, AppResult};

/// Server state shared by every request handler
///
/// Cloning is cheap: the pool is an Arc internally.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub db: SqlitePool,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录结构存在
    /// 2. 打开数据库并应用迁移
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_path = config.db_path();
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::internal(format!("Failed to create {parent:?}: {e}")))?;
        }

        let db = DbService::new(&db_path).await?;
        tracing::info!("Server state initialized (db: {db_path})");

        Ok(Self {
            config: config.clone(),
            db: db.pool,
        })
    }
}
