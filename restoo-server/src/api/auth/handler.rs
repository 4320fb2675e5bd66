//! Account Handlers
//!
//! Registration, login, profile maintenance, password reset and e-mail
//! verification.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::auth::password::{digest_token, generate_token, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{User, UserDetailsPatch};
use crate::db::repository::{RepoError, UserRepository, user::NewUser};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode, created, ok};
use shared::models::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, UpdateDetailsRequest, UpdatePasswordRequest, UserProfile,
};

/// Reset tokens expire after 10 minutes
const RESET_TOKEN_TTL_MS: i64 = 10 * 60 * 1000;

fn email_taken(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmailExists, msg),
        other => other.into(),
    }
}

fn auth_response(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let token = state.get_jwt_service().token_for(user)?;
    Ok(AuthResponse {
        token,
        user: user.profile(),
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate()?;

    let role = req.role.unwrap_or_default();
    if role == Role::Admin {
        security_log!("WARN", "admin_self_registration", email = req.email.clone());
        return Err(AppError::new(ErrorCode::CannotRegisterAdmin));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash: hash_password(&req.password)?,
            phone: req.phone,
            role,
            verification_token: Some(generate_token()),
        })
        .await
        .map_err(email_taken)?;

    tracing::info!(user_id = %user.id_string(), role = %user.role, "User registered");
    Ok(created(auth_response(&state, &user)?))
}

/// POST /api/auth/login
///
/// Unknown e-mail and wrong password answer identically after the same delay.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<shared::ApiResponse<AuthResponse>>> {
    req.validate()
        .map_err(|_| AppError::validation("Please provide an email and password"))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;

    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        Some(user) => {
            security_log!(
                "WARN",
                "login_failed",
                user_id = user.id_string(),
                reason = "invalid_password"
            );
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(user_id = %user.id_string(), role = %user.role, "User logged in");
    Ok(ok(auth_response(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<shared::ApiResponse<UserProfile>>> {
    let user = UserRepository::new(state.get_db())
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ok(user.profile()))
}

/// PUT /api/auth/updatedetails
pub async fn update_details(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<UpdateDetailsRequest>,
) -> AppResult<Json<shared::ApiResponse<UserProfile>>> {
    req.validate()?;

    let patch = UserDetailsPatch {
        name: req.name.map(|n| n.trim().to_string()),
        email: req.email,
        phone: req.phone,
        address: req.address,
        avatar: req.avatar,
        updated_at: 0,
    };
    let user = UserRepository::new(state.get_db())
        .update_details(&current_user.id, patch)
        .await
        .map_err(email_taken)?;
    Ok(ok(user.profile()))
}

/// PUT /api/auth/updatepassword
pub async fn update_password(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> AppResult<Json<shared::ApiResponse<AuthResponse>>> {
    req.validate()?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !verify_password(&req.current_password, &user.password_hash) {
        security_log!(
            "WARN",
            "password_change_rejected",
            user_id = current_user.id.clone()
        );
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Password is incorrect",
        ));
    }

    let user = repo
        .set_password(&current_user.id, hash_password(&req.new_password)?)
        .await?;
    tracing::info!(user_id = %current_user.id, "Password changed");
    Ok(ok(auth_response(&state, &user)?))
}

/// POST /api/auth/forgotpassword
///
/// Only the SHA-256 digest of the reset token is stored. The plain token is
/// echoed back in development, where no mailer is wired.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<shared::ApiResponse<ForgotPasswordResponse>>> {
    req.validate()?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&req.email).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::UserNotFound, "There is no user with that email")
    })?;

    let token = generate_token();
    let expire = chrono::Utc::now().timestamp_millis() + RESET_TOKEN_TTL_MS;
    repo.set_reset_token(&user.id_string(), digest_token(&token), expire)
        .await?;

    security_log!("INFO", "password_reset_requested", user_id = user.id_string());
    Ok(ok(ForgotPasswordResponse {
        message: "Password reset token issued".to_string(),
        reset_token: state.config.is_development().then_some(token),
    }))
}

/// PUT /api/auth/resetpassword/{token}
pub async fn reset_password(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<shared::ApiResponse<AuthResponse>>> {
    req.validate()?;

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_reset_token(&digest_token(token.trim()))
        .await?
        .ok_or_else(|| {
            security_log!("WARN", "password_reset_invalid_token", token_len = token.len());
            AppError::new(ErrorCode::InvalidResetToken)
        })?;

    let user = repo
        .set_password(&user.id_string(), hash_password(&req.password)?)
        .await?;
    tracing::info!(user_id = %user.id_string(), "Password reset");
    Ok(ok(auth_response(&state, &user)?))
}

/// GET /api/auth/verify/{token}
pub async fn verify_email(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<shared::ApiResponse<AuthResponse>>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_verification_token(token.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidVerificationToken))?;

    let user = repo.mark_verified(&user.id_string()).await?;
    tracing::info!(user_id = %user.id_string(), "Email verified");
    Ok(ok(auth_response(&state, &user)?))
}
