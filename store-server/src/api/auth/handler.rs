//! Auth API Handlers
//!
//! 注册 / 登录 / 当前用户。登录失败统一返回同一错误，
//! 不泄露账号是否存在。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::models::{User, UserRole};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult, validate_payload};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register - 注册客户账号
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_payload(&payload)?;

    let hash = hash_password(&payload.password)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(
            payload.email.trim().to_lowercase(),
            payload.name.trim().to_string(),
            hash,
            UserRole::Customer,
        )
        .await?;

    issue_token(&state, user)
}

/// POST /api/auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_payload(&payload)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&payload.email.trim().to_lowercase())
        .await?;

    // 统一的失败路径: 账号不存在和密码错误不可区分
    let denied = || AppError::forbidden("Invalid email or password");

    let user = user.ok_or_else(denied)?;
    let hash = user.password_hash.as_deref().ok_or_else(denied)?;
    if !verify_password(&payload.password, hash) {
        tracing::warn!(target: "security", email = %user.email, "Failed login attempt");
        return Err(denied());
    }

    issue_token(&state, user)
}

/// GET /api/auth/me - 当前登录用户
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;
    Ok(Json(account.sanitized()))
}

fn issue_token(state: &ServerState, user: User) -> AppResult<Json<AuthResponse>> {
    let id = user
        .id
        .as_ref()
        .map(|rid| rid.to_string())
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let token = state
        .jwt_service
        .generate_token(&id, &user.name, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(AuthResponse {
        token,
        user: user.sanitized(),
    }))
}
