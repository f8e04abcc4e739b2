//! Booking Server - 餐厅电话预订引擎
//!
//! # 架构概述
//!
//! 本模块是预订引擎的主入口，提供以下核心功能：
//!
//! - **容量账本** (`db/repository/time_slot`): 每时段、每座区的容量计数
//! - **可订性查询** (`booking/availability`): 精确命中 + ±2 小时备选
//! - **预订事务** (`booking/transaction`): 原子扣减容量，永不超订
//! - **回拨队列** (`db/repository/callback`): 无法即时完成时的人工升级
//! - **HTTP API** (`api`): RPC 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── booking/       # 可订性查询、预订事务、确认码
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (SQLite)
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), None);
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
