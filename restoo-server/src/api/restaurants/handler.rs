//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::menu_items::create_in_restaurant;
use crate::auth::{Action, CurrentUser, MaybeUser, authorize};
use crate::core::ServerState;
use crate::db::models::{MenuItem, Restaurant, RestaurantFilter, RestaurantPatch};
use crate::db::repository::{
    CategoryRepository, MenuItemRepository, RestaurantRepository, UserRepository, normalize_id,
};
use crate::utils::{AppError, AppResult, ErrorCode, created, ok};
use shared::ApiResponse;
use shared::models::{MenuItemCreate, Page, RestaurantCreate, RestaurantQuery, RestaurantUpdate};

pub(crate) async fn load_restaurant(state: &ServerState, id: &str) -> AppResult<Restaurant> {
    RestaurantRepository::new(state.get_db())
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::RestaurantNotFound,
                format!("Restaurant {} not found", id),
            )
        })
}

/// Normalize category references and make sure each one exists
async fn resolve_categories(state: &ServerState, raw: Vec<String>) -> AppResult<Vec<String>> {
    let repo = CategoryRepository::new(state.get_db());
    let mut ids = Vec::with_capacity(raw.len());
    for id in raw {
        let category = repo.find_by_id(&id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {} not found", id),
            )
        })?;
        let key = category.id_string();
        if !ids.contains(&key) {
            ids.push(key);
        }
    }
    Ok(ids)
}

/// GET /api/restaurants - 活跃餐厅列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RestaurantQuery>,
) -> AppResult<Json<ApiResponse<Vec<Restaurant>>>> {
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    let restaurants = RestaurantRepository::new(state.get_db())
        .find_filtered(RestaurantFilter {
            cuisine: query.cuisine,
            city: query.city,
            search: query.search,
            include_inactive: false,
            limit: page.limit(),
            offset: page.offset(),
        })
        .await?;
    Ok(ok(restaurants))
}

/// GET /api/restaurants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    Ok(ok(load_restaurant(&state, &id).await?))
}

/// POST /api/restaurants - 创建餐厅 (所有者为调用者, 管理员可指定)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RestaurantCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&current_user, Action::CreateRestaurant, None)?;
    payload.validate()?;

    let owner = match payload.owner.as_deref() {
        Some(owner) if current_user.is_admin() => UserRepository::new(state.get_db())
            .find_by_id(owner)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::UserNotFound, format!("User {} not found", owner))
            })?
            .id_string(),
        _ => current_user.id.clone(),
    };
    let categories = resolve_categories(&state, payload.categories).await?;

    let restaurant = RestaurantRepository::new(state.get_db())
        .create(Restaurant {
            id: None,
            name: payload.name.trim().to_string(),
            owner,
            description: payload.description,
            cuisine: payload.cuisine,
            address: payload.address,
            location: payload.location,
            images: payload.images,
            opening_hours: payload.opening_hours,
            delivery_fee: payload.delivery_fee,
            minimum_order: payload.minimum_order,
            is_active: true,
            is_verified: false,
            categories,
            rating: 0.0,
            total_ratings: 0,
            created_at: 0,
            updated_at: 0,
        })
        .await?;

    tracing::info!(
        restaurant_id = %restaurant.id_string(),
        owner = %restaurant.owner,
        "Restaurant created"
    );
    Ok(created(restaurant))
}

/// PUT /api/restaurants/{id} - 部分更新 (评分字段只读)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<ApiResponse<Restaurant>>> {
    let restaurant = load_restaurant(&state, &id).await?;
    authorize(&current_user, Action::ManageRestaurant, Some(&restaurant.owner))?;
    payload.validate()?;

    if payload.is_verified.is_some() && !current_user.is_admin() {
        return Err(AppError::with_message(
            ErrorCode::AdminRequired,
            "Only administrators can verify restaurants",
        ));
    }

    let categories = match payload.categories {
        Some(raw) => Some(resolve_categories(&state, raw).await?),
        None => None,
    };

    let patch = RestaurantPatch {
        name: payload.name.map(|n| n.trim().to_string()),
        description: payload.description,
        cuisine: payload.cuisine,
        address: payload.address,
        location: payload.location,
        images: payload.images,
        opening_hours: payload.opening_hours,
        delivery_fee: payload.delivery_fee,
        minimum_order: payload.minimum_order,
        categories,
        is_active: payload.is_active,
        is_verified: payload.is_verified,
        updated_at: 0,
    };
    let updated = RestaurantRepository::new(state.get_db())
        .update(&restaurant.id_string(), patch)
        .await?;
    Ok(ok(updated))
}

/// DELETE /api/restaurants/{id} - 连同菜单一起删除
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Action::DeleteRestaurant, None)?;
    let restaurant = load_restaurant(&state, &id).await?;

    let restaurant_id = restaurant.id_string();
    RestaurantRepository::new(state.get_db())
        .delete(&restaurant_id)
        .await?;

    tracing::info!(restaurant_id = %restaurant_id, user_id = %current_user.id, "Restaurant deleted");
    Ok(Json(ApiResponse::ok()))
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    /// Include unavailable items (owner / admin only)
    #[serde(default)]
    pub all: bool,
}

/// GET /api/restaurants/{id}/menu
pub async fn menu(
    State(state): State<ServerState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let restaurant = load_restaurant(&state, &id).await?;
    let include_unavailable = query.all
        && user
            .as_ref()
            .is_some_and(|u| u.is_admin() || restaurant.is_owned_by(&u.id));

    let items = MenuItemRepository::new(state.get_db())
        .find_by_restaurant(&restaurant.id_string(), include_unavailable)
        .await?;
    Ok(ok(items))
}

/// POST /api/restaurants/{id}/menu
pub async fn create_menu_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(mut payload): Json<MenuItemCreate>,
) -> AppResult<impl IntoResponse> {
    payload.restaurant = Some(normalize_id("restaurant", &id).map_err(|_| {
        AppError::with_message(
            ErrorCode::RestaurantNotFound,
            format!("Restaurant {} not found", id),
        )
    })?);
    let item = create_in_restaurant(&state, &current_user, payload).await?;
    Ok(created(item))
}
