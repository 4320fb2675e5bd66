//! Admin Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::{Action, CurrentUser, authorize};
use crate::core::ServerState;
use crate::db::models::{Order, OrderScope, Restaurant, RestaurantFilter};
use crate::db::repository::{RestaurantRepository, UserRepository, normalize_id};
use crate::orders::OrderService;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, ok};
use shared::ApiResponse;
use shared::models::{Page, RestaurantQuery, RoleUpdateRequest, UserProfile};
use shared::order::OrderQuery;

fn user_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", id))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    authorize(&current_user, Action::AdminConsole, None)?;
    let users = UserRepository::new(state.get_db()).find_all().await?;
    Ok(ok(users.into_iter().map(UserProfile::from).collect()))
}

/// GET /api/admin/restaurants - 包含已停用的餐厅
pub async fn list_restaurants(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<RestaurantQuery>,
) -> AppResult<Json<ApiResponse<Vec<Restaurant>>>> {
    authorize(&current_user, Action::AdminConsole, None)?;
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    let restaurants = RestaurantRepository::new(state.get_db())
        .find_filtered(RestaurantFilter {
            cuisine: query.cuisine,
            city: query.city,
            search: query.search,
            include_inactive: true,
            limit: page.limit(),
            offset: page.offset(),
        })
        .await?;
    Ok(ok(restaurants))
}

/// GET /api/admin/orders?status=
pub async fn list_orders(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    authorize(&current_user, Action::AdminConsole, None)?;
    let orders = OrderService::new(state.get_db())
        .list_scoped(OrderScope::All, query)
        .await?;
    Ok(ok(orders))
}

/// PUT /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    authorize(&current_user, Action::AdminConsole, None)?;
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| user_not_found(&id))?;

    let updated = repo.set_role(&user.id_string(), payload.role).await?;
    security_log!(
        "INFO",
        "role_changed",
        user_id = updated.id_string(),
        from = user.role.as_str(),
        to = updated.role.as_str(),
        by = current_user.id.clone()
    );
    Ok(ok(updated.profile()))
}

/// DELETE /api/admin/users/{id} - 不能删除自己
pub async fn delete_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Action::AdminConsole, None)?;

    let target = normalize_id("user", &id).map_err(|_| user_not_found(&id))?;
    if target == current_user.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    if !UserRepository::new(state.get_db()).delete(&target).await? {
        return Err(user_not_found(&id));
    }
    security_log!(
        "INFO",
        "user_deleted",
        user_id = target,
        by = current_user.id.clone()
    );
    Ok(Json(ApiResponse::ok()))
}
