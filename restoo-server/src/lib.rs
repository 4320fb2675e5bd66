//! Restoo Server - 外卖平台 REST API
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储与仓储层
//! - **认证** (`auth`): JWT + Argon2 认证, 角色与资源级权限
//! - **订单** (`orders`): 订单生命周期、价格核对与条件更新
//! - **评价** (`reviews`): 评价与评分聚合
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! restoo-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── services/      # 路由组装与 HTTP 中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误转换、日志
//! ├── db/            # 数据库层
//! ├── orders/        # 订单状态机与服务
//! └── reviews/       # 评价与评分聚合
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reviews;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use reviews::ReviewService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 记录到 "security" target
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

/// 加载 `.env`、读取配置并初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ \___  _____/ /_____  ____
  / /_/ / _ \/ ___/ __/ __ \/ __ \
 / _, _/  __(__  ) /_/ /_/ / /_/ /
/_/ |_|\___/____/\__/\____/\____/
    "#
    );
}
