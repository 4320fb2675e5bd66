//! Repository Module
//!
//! CRUD operations over the SurrealDB tables.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

// Re-exports
pub use category::CategoryRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use restaurant::RestaurantRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // Unique index violation
        if message.contains("already contains") {
            return RepoError::Duplicate(message);
        }
        RepoError::Database(message)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 记录自身 id 为 RecordId, 对其他记录的引用存为 "table:id" 字符串。
// 路径参数同时接受 "table:id" 与纯 id, 由 parse_id 统一解析。

/// Parse a path / body id into a record id of `table`
///
/// Accepts "table:key" and the bare "key"; an id of another table is
/// reported as not found.
pub fn parse_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RepoError::Validation(format!("Empty {} id", table)));
    }
    match raw.split_once(':') {
        Some((t, key)) if t == table && !key.is_empty() => {
            Ok(RecordId::from_table_key(table, key))
        }
        Some(_) => Err(RepoError::NotFound(format!("{} {} not found", table, raw))),
        None => Ok(RecordId::from_table_key(table, raw)),
    }
}

/// Canonical "table:key" string of a path / body id
pub fn normalize_id(table: &str, raw: &str) -> RepoResult<String> {
    parse_id(table, raw).map(|id| id.to_string())
}

/// Current time in epoch millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_both_forms() {
        assert_eq!(
            parse_id("order", "order:abc").unwrap().to_string(),
            "order:abc"
        );
        assert_eq!(parse_id("order", "abc").unwrap().to_string(), "order:abc");
    }

    #[test]
    fn test_parse_id_rejects_other_table() {
        assert!(matches!(
            parse_id("order", "user:abc"),
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(parse_id("order", " "), Err(RepoError::Validation(_))));
        assert!(matches!(
            parse_id("order", "order:"),
            Err(RepoError::NotFound(_))
        ));
    }
}
