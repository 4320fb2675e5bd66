//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::models::Role;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// 无需登录的路由
///
/// 浏览类 GET 接口对匿名用户开放; 携带有效令牌时仍会解析当前用户。
fn is_public_route(method: &Method, path: &str) -> bool {
    let path = path.trim_end_matches('/');

    if matches!(
        path,
        "/api/auth/register" | "/api/auth/login" | "/api/auth/forgotpassword"
    ) {
        return true;
    }
    if path.starts_with("/api/auth/resetpassword/") || path.starts_with("/api/auth/verify/") {
        return true;
    }

    *method == Method::GET
        && (path == "/api/restaurants"
            || path.starts_with("/api/restaurants/")
            || path.starts_with("/api/menu-items/")
            || path == "/api/categories"
            || path.starts_with("/api/categories/")
            || path == "/api/reviews"
            || path.starts_with("/api/reviews/"))
}

/// 校验令牌并从数据库解析当前用户
///
/// 令牌主体已被删除时视为未认证。
pub async fn resolve_user(state: &ServerState, header: Option<&str>) -> Result<CurrentUser, AppError> {
    let header = header.ok_or_else(AppError::unauthorized)?;
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = format!("{}", e));
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user = UserRepository::new(state.get_db())
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| {
            security_log!("WARN", "auth_user_missing", user_id = claims.sub.clone());
            AppError::invalid_token("User no longer exists")
        })?;

    Ok(CurrentUser::from(&user))
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT, 再按 `sub` 查询用户。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的请求
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - [`is_public_route`] 列出的公共接口
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 用户已删除 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_string();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    if is_public_route(req.method(), &path) {
        // 可选认证: 令牌无效时按匿名处理
        if let Some(header) = header.as_deref()
            && let Ok(user) = resolve_user(&state, Some(header)).await
        {
            req.extensions_mut().insert(user);
        }
        return Ok(next.run(req).await);
    }

    if header.is_none() {
        security_log!("WARN", "auth_missing", uri = path.clone());
    }
    let user = resolve_user(&state, header.as_deref()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 角色检查中间件 - 调用者角色须在允许列表中
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/admin/users", get(handler::list_users))
///     .layer(middleware::from_fn(require_role(&[Role::Admin])));
/// ```
///
/// # 错误
///
/// 未登录返回 401, 角色不符返回 403
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req.current_user()?;

            if !user.has_any_role(roles) {
                security_log!(
                    "WARN",
                    "role_required",
                    user_id = user.id.clone(),
                    role = user.role.as_str(),
                    uri = req.uri().path().to_string()
                );
                let allowed: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                let code = if roles == [Role::Admin] {
                    ErrorCode::AdminRequired
                } else {
                    ErrorCode::RoleRequired
                };
                return Err(AppError::with_message(
                    code,
                    format!(
                        "User role {} is not authorized to access this route",
                        user.role
                    ),
                )
                .with_detail("allowed_roles", allowed));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 从请求中提取 CurrentUser 的扩展方法
pub trait CurrentUserExt {
    /// 从请求扩展中获取 CurrentUser
    ///
    /// # 错误
    ///
    /// 未认证返回 401
    fn current_user(&self) -> Result<&CurrentUser, AppError>;
}

impl CurrentUserExt for Request {
    fn current_user(&self) -> Result<&CurrentUser, AppError> {
        self.extensions()
            .get::<CurrentUser>()
            .ok_or_else(AppError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_route(&Method::PUT, "/api/auth/resetpassword/abc"));
        assert!(is_public_route(&Method::GET, "/api/auth/verify/abc"));
        assert!(is_public_route(&Method::GET, "/api/restaurants"));
        assert!(is_public_route(&Method::GET, "/api/restaurants/restaurant:1/menu"));
        assert!(is_public_route(&Method::GET, "/api/reviews"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::POST, "/api/restaurants"));
        assert!(!is_public_route(&Method::POST, "/api/orders"));
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::DELETE, "/api/categories/category:1"));
        assert!(!is_public_route(&Method::GET, "/api/admin/users"));
    }
}
