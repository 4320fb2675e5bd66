//! Restaurant API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/restaurants | GET | 公开 |
//! | /api/restaurants | POST | restaurant_owner, admin |
//! | /api/restaurants/{id} | GET | 公开 |
//! | /api/restaurants/{id} | PUT | 餐厅所有者或管理员 |
//! | /api/restaurants/{id} | DELETE | admin |
//! | /api/restaurants/{id}/menu | GET | 公开 (`?all=true` 仅所有者/管理员) |
//! | /api/restaurants/{id}/menu | POST | 餐厅所有者或管理员 |

mod handler;

pub(crate) use handler::load_restaurant;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_role;
use crate::core::ServerState;
use shared::models::Role;

const CATALOG_ROLES: &[Role] = &[Role::RestaurantOwner, Role::Admin];

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    let owners = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/menu", post(handler::create_menu_item))
        .route_layer(middleware::from_fn(require_role(CATALOG_ROLES)));

    Router::new()
        .route("/", get(handler::list))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/menu", get(handler::menu))
        .merge(owners)
}
