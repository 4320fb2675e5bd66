//! Order API 模块
//!
//! 状态变更走 [`crate::orders::OrderService`], 所有写操作都是基于
//! (status, version) 的条件更新。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_role;
use crate::core::ServerState;
use shared::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/status",
            put(handler::update_status).route_layer(middleware::from_fn(require_role(&[
                Role::RestaurantOwner,
                Role::DeliveryPartner,
                Role::Admin,
            ]))),
        )
        .route("/{id}/cancel", put(handler::cancel))
        .route("/{id}/payment-status", put(handler::update_payment_status))
}
