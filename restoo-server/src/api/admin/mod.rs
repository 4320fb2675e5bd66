//! Admin console
//!
//! 整个模块由 `require_role(&[Role::Admin])` 保护。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_role;
use crate::core::ServerState;
use shared::models::Role;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/{id}", delete(handler::delete_user))
        .route("/users/{id}/role", put(handler::update_role))
        .route("/restaurants", get(handler::list_restaurants))
        .route("/orders", get(handler::list_orders))
        .route_layer(middleware::from_fn(require_role(&[Role::Admin])))
}
