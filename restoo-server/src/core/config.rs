use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 数据库路径取该值时使用内存引擎 (测试 / 演示)
pub const MEMORY_DATABASE: &str = "memory";

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | DATABASE_PATH | $WORK_DIR/database/restoo.db | RocksDB 目录, `memory` 为内存引擎 |
/// | DB_NAMESPACE | restoo | SurrealDB namespace |
/// | DB_NAME | restoo | SurrealDB database |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 设置后写入滚动日志文件 |
/// | LOGIN_DELAY_MS | 500 | 登录固定延迟(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 DATABASE_PATH=memory cargo run -p restoo-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 数据库目录, 或 [`MEMORY_DATABASE`]
    pub database_path: String,
    pub db_namespace: String,
    pub db_name: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 登录接口的固定延迟 (毫秒)
    pub login_delay_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self::from_env_with_jwt(JwtConfig::default())
    }

    fn from_env_with_jwt(jwt: JwtConfig) -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("database")
                .join("restoo.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            work_dir,
            database_path,
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "restoo".into()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "restoo".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            login_delay_ms: std::env::var("LOGIN_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(500),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 内存数据库 + 固定 JWT 密钥的配置
    ///
    /// 常用于测试场景
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let mut config = Self::from_env_with_jwt(jwt);
        config.database_path = MEMORY_DATABASE.into();
        config.environment = "test".into();
        config.login_delay_ms = 0;
        config
    }

    pub fn uses_memory_database(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 确保工作目录结构存在 (内存数据库时只需日志目录)
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        if !self.uses_memory_database()
            && let Some(parent) = PathBuf::from(&self.database_path).parent()
        {
            std::fs::create_dir_all(parent)?;
        }
        if let Some(dir) = &self.log_dir {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
