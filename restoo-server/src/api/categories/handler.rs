//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::auth::{Action, CurrentUser, authorize};
use crate::core::ServerState;
use crate::db::models::{Category, CategoryPatch};
use crate::db::repository::{CategoryRepository, RepoError};
use crate::utils::{AppError, AppResult, ErrorCode, created, ok};
use shared::ApiResponse;
use shared::models::{CategoryCreate, CategoryUpdate};

fn category_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CategoryNameExists, msg),
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::CategoryInUse, msg),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::CategoryNotFound, msg),
        other => other.into(),
    }
}

/// GET /api/categories - 活跃分类, 按 sort_order 排序
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = CategoryRepository::new(state.get_db()).find_all().await?;
    Ok(ok(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = CategoryRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {} not found", id),
            )
        })?;
    Ok(ok(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&current_user, Action::ManageCategories, None)?;
    payload.validate()?;

    let category = CategoryRepository::new(state.get_db())
        .create(payload)
        .await
        .map_err(category_error)?;
    tracing::info!(category_id = %category.id_string(), name = %category.name, "Category created");
    Ok(created(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    authorize(&current_user, Action::ManageCategories, None)?;
    payload.validate()?;

    let patch = CategoryPatch {
        name: payload.name,
        description: payload.description,
        image: payload.image,
        icon: payload.icon,
        is_active: payload.is_active,
        sort_order: payload.sort_order,
        updated_at: 0,
    };
    let category = CategoryRepository::new(state.get_db())
        .update(&id, patch)
        .await
        .map_err(category_error)?;
    Ok(ok(category))
}

/// DELETE /api/categories/{id} - 仍被菜品引用时拒绝
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Action::ManageCategories, None)?;

    let deleted = CategoryRepository::new(state.get_db())
        .delete(&id)
        .await
        .map_err(category_error)?;
    if !deleted {
        return Err(AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {} not found", id),
        ));
    }
    tracing::info!(category_id = %id, "Category deleted");
    Ok(Json(ApiResponse::ok()))
}
