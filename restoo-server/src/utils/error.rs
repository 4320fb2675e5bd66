//! 统一错误处理
//!
//! 错误类型来自 `shared::error`; 本模块补充服务端错误到 [`AppError`] 的转换
//! 以及成功响应的构造函数。
//!
//! # 使用示例
//!
//! ```ignore
//! // 仓储错误直接用 ? 传播
//! let order = repo.find_by_id(&id).await?;
//!
//! // 返回成功响应
//! Ok(ok(order))
//! ```

use axum::Json;
use http::StatusCode;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::auth::JwtError;
use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::InvalidToken(_) | JwtError::InvalidSignature => {
                AppError::invalid_token("Invalid token")
            }
            JwtError::GenerationFailed(msg) => {
                AppError::internal(format!("Failed to generate token: {}", msg))
            }
            JwtError::ConfigError(msg) => AppError::with_message(ErrorCode::ConfigError, msg),
        }
    }
}

/// 200 `{ success: true, data }`
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// 201 `{ success: true, data }`
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}
