//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 账户注册、登录与找回密码
//! - [`restaurants`] - 餐厅与菜单
//! - [`menu_items`] - 菜品管理
//! - [`categories`] - 分类管理
//! - [`orders`] - 订单生命周期
//! - [`reviews`] - 评价
//! - [`admin`] - 管理后台

pub mod auth;
pub mod health;

// Catalog
pub mod categories;
pub mod menu_items;
pub mod restaurants;

// Orders & reviews
pub mod orders;
pub mod reviews;

pub mod admin;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
