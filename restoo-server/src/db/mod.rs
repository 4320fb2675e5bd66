//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, or the in-memory engine) plus the
//! schema definitions applied at start-up.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::Config;
use crate::utils::AppError;

/// Tables are schemaless; the unique indexes back the duplicate checks done
/// in the repositories.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;

DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
DEFINE INDEX IF NOT EXISTS category_name ON TABLE category FIELDS name UNIQUE;

DEFINE TABLE IF NOT EXISTS restaurant SCHEMALESS;
DEFINE INDEX IF NOT EXISTS restaurant_owner ON TABLE restaurant FIELDS owner;

DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
DEFINE INDEX IF NOT EXISTS menu_item_restaurant ON TABLE menu_item FIELDS restaurant;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_customer ON TABLE order FIELDS customer;

DEFINE TABLE IF NOT EXISTS review SCHEMALESS;
DEFINE INDEX IF NOT EXISTS review_order_user ON TABLE review FIELDS `order`, user UNIQUE;
DEFINE INDEX IF NOT EXISTS review_restaurant ON TABLE review FIELDS restaurant;
"#;

/// Database service, owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the configured engine, select namespace / database, apply schema
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = if config.uses_memory_database() {
            Surreal::new::<Mem>(())
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
        } else {
            Surreal::new::<RocksDb>(config.database_path.as_str())
                .await
                .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?
        };

        db.use_ns(config.db_namespace.as_str())
            .use_db(config.db_name.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        tracing::info!(
            path = %config.database_path,
            namespace = %config.db_namespace,
            database = %config.db_name,
            "Database connection established"
        );

        apply_schema(&db).await?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }
}

async fn apply_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
    Ok(())
}
