//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Review;
use crate::reviews::ReviewService;
use crate::utils::{AppResult, created, ok};
use shared::ApiResponse;
use shared::models::{ReviewCreate, ReviewQuery, ReviewUpdate};

/// GET /api/reviews?restaurant=&menu_item= - 最新的在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let reviews = ReviewService::new(state.get_db()).list(query).await?;
    Ok(ok(reviews))
}

/// GET /api/reviews/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = ReviewService::new(state.get_db()).get(&id).await?;
    Ok(ok(review))
}

/// POST /api/reviews - 仅限已送达订单的下单人
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<impl IntoResponse> {
    let review = ReviewService::new(state.get_db())
        .create(&current_user, payload)
        .await?;
    Ok(created(review))
}

/// PUT /api/reviews/{id} - 仅作者
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewUpdate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let review = ReviewService::new(state.get_db())
        .update(&current_user, &id, payload)
        .await?;
    Ok(ok(review))
}

/// DELETE /api/reviews/{id} - 作者或管理员
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    ReviewService::new(state.get_db())
        .delete(&current_user, &id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
