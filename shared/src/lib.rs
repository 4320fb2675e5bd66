//! Shared types for Restoo
//!
//! Types used by the server and by Rust clients: error codes and the API
//! envelope, catalog / account / review DTOs, order value types, pricing,
//! and the client-side cart.

pub mod cart;
pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
