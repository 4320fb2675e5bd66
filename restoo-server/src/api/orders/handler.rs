//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::OrderService;
use crate::utils::{AppResult, created, ok};
use shared::ApiResponse;
use shared::order::{
    CancelOrderRequest, CreateOrderRequest, OrderQuery, PaymentStatusRequest,
    StatusUpdateRequest, UpdateOrderRequest,
};

/// POST /api/orders - 按当前菜单价格核对后下单
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::new(state.get_db())
        .create(&current_user, payload)
        .await?;
    Ok(created(order))
}

/// GET /api/orders - 调用者可见范围内的订单
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderService::new(state.get_db())
        .list(&current_user, query)
        .await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(state.get_db())
        .get(&current_user, &id)
        .await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id} - 仅 pending 状态可修改
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(state.get_db())
        .update(&current_user, &id, payload)
        .await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(state.get_db())
        .advance_status(&current_user, &id, payload)
        .await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    payload: Option<Json<CancelOrderRequest>>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let Json(payload) = payload.unwrap_or_default();
    let order = OrderService::new(state.get_db())
        .cancel(&current_user, &id, payload.reason)
        .await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}/payment-status
pub async fn update_payment_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = OrderService::new(state.get_db())
        .set_payment_status(&current_user, &id, payload.payment_status)
        .await?;
    Ok(ok(order))
}

/// DELETE /api/orders/{id} - 仅管理员
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    OrderService::new(state.get_db())
        .delete(&current_user, &id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
