//! 服务模块
//!
//! - [`https`] - 路由组装与 HTTP 中间件

pub mod https;

pub use https::{build_app, build_router};
