//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::restaurants::load_restaurant;
use crate::auth::{Action, CurrentUser, authorize};
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemPatch};
use crate::db::repository::{CategoryRepository, MenuItemRepository};
use crate::utils::{AppError, AppResult, ErrorCode, created, ok};
use shared::ApiResponse;
use shared::models::{MenuItemCreate, MenuItemUpdate};

async fn load_item(state: &ServerState, id: &str) -> AppResult<MenuItem> {
    MenuItemRepository::new(state.get_db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", id),
            )
        })
}

/// Canonical id of an existing category
async fn resolve_category(state: &ServerState, id: &str) -> AppResult<String> {
    let category = CategoryRepository::new(state.get_db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {} not found", id),
            )
        })?;
    Ok(category.id_string())
}

/// Create a menu item in `payload.restaurant` after checking ownership
pub(crate) async fn create_in_restaurant(
    state: &ServerState,
    current_user: &CurrentUser,
    payload: MenuItemCreate,
) -> AppResult<MenuItem> {
    let restaurant_ref = payload
        .restaurant
        .as_deref()
        .ok_or_else(|| AppError::validation("Please add a restaurant"))?;
    let restaurant = load_restaurant(state, restaurant_ref).await?;
    authorize(current_user, Action::ManageMenu, Some(&restaurant.owner))?;
    payload.validate()?;

    let category = resolve_category(state, &payload.category).await?;
    let item = MenuItemRepository::new(state.get_db())
        .create(MenuItem {
            id: None,
            name: payload.name.trim().to_string(),
            restaurant: restaurant.id_string(),
            category,
            description: payload.description,
            price: payload.price,
            image: payload.image,
            ingredients: payload.ingredients,
            dietary_info: payload.dietary_info,
            preparation_time: payload.preparation_time,
            is_available: true,
            customization_options: payload.customization_options,
            rating: 0.0,
            total_ratings: 0,
            created_at: 0,
            updated_at: 0,
        })
        .await?;

    tracing::info!(
        menu_item_id = %item.id_string(),
        restaurant_id = %item.restaurant,
        "Menu item created"
    );
    Ok(item)
}

/// POST /api/menu-items
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<impl IntoResponse> {
    let item = create_in_restaurant(&state, &current_user, payload).await?;
    Ok(created(item))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    Ok(ok(load_item(&state, &id).await?))
}

/// PUT /api/menu-items/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let item = load_item(&state, &id).await?;
    let restaurant = load_restaurant(&state, &item.restaurant).await?;
    authorize(&current_user, Action::ManageMenu, Some(&restaurant.owner))?;
    payload.validate()?;

    let category = match payload.category.as_deref() {
        Some(raw) => Some(resolve_category(&state, raw).await?),
        None => None,
    };

    let patch = MenuItemPatch {
        name: payload.name.map(|n| n.trim().to_string()),
        category,
        description: payload.description,
        price: payload.price,
        image: payload.image,
        ingredients: payload.ingredients,
        dietary_info: payload.dietary_info,
        preparation_time: payload.preparation_time,
        is_available: payload.is_available,
        customization_options: payload.customization_options,
        updated_at: 0,
    };
    let updated = MenuItemRepository::new(state.get_db())
        .update(&item.id_string(), patch)
        .await?;
    Ok(ok(updated))
}

/// DELETE /api/menu-items/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let item = load_item(&state, &id).await?;
    let restaurant = load_restaurant(&state, &item.restaurant).await?;
    authorize(&current_user, Action::ManageMenu, Some(&restaurant.owner))?;

    MenuItemRepository::new(state.get_db())
        .delete(&item.id_string())
        .await?;
    tracing::info!(menu_item_id = %item.id_string(), user_id = %current_user.id, "Menu item deleted");
    Ok(Json(ApiResponse::ok()))
}
