use axum::{Router, middleware};
use http::{HeaderName, Uri};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// 同时处理的请求上限
const MAX_CONCURRENT_REQUESTS: usize = 256;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP 请求日志中间件
///
/// 请求 ID 由外层 [`SetRequestIdLayer`] 写入 `x-request-id`, 并原样回写到响应。
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(
            target: "http_access",
            request_id = %request_id,
            elapsed_ms,
            "{} {} {}",
            method,
            uri,
            status
        );
    } else {
        tracing::info!(
            target: "http_access",
            request_id = %request_id,
            elapsed_ms,
            "{} {} {}",
            method,
            uri,
            status
        );
    }

    response
}

/// 未匹配的路由返回统一的 404 响应体
async fn route_not_found(uri: Uri) -> AppError {
    AppError::with_message(ErrorCode::NotFound, format!("Route {} not found", uri.path()))
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        // Catalog
        .merge(crate::api::restaurants::router())
        .merge(crate::api::menu_items::router())
        .merge(crate::api::categories::router())
        // Orders & reviews
        .merge(crate::api::orders::router())
        .merge(crate::api::reviews::router())
        .merge(crate::api::admin::router())
        .fallback(route_not_found)
}

/// Full application: routes, authentication, CORS, compression, access log
pub fn build_router(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_app()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
}
