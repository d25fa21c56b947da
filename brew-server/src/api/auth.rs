//! Authentication endpoints: register, login, logout, profile

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    AuthResponse, LoginRequest, NewUser, PasswordChange, User, UserCreate, UserUpdate,
};

use super::{ApiResult, CreatedResult, created, load_active};
use crate::auth::CurrentUser;
use crate::auth::password::{hash_blocking, verify_blocking};
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

fn issue_token(state: &AppState, user: User) -> ServiceResult<AuthResponse> {
    let access_token = state.jwt.generate_token(&user).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expires_secs(),
        user,
    })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<UserCreate>,
) -> CreatedResult<AuthResponse> {
    let req = req.normalized();
    req.validate()?;

    let password_hash = hash_blocking(state.hasher.clone(), req.password.clone()).await?;
    let user = db::users::create(&state.pool, &NewUser::new(req, password_hash)).await?;

    tracing::info!(user_id = user.id, username = %user.username, name = %user.display_name(), "User registered");
    Ok(created(issue_token(&state, user)?))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = db::users::find_by_login(&state.pool, &req.login)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let valid = verify_blocking(
        state.hasher.clone(),
        req.password,
        user.password_hash.clone(),
    )
    .await?;
    if !valid {
        tracing::warn!(username = %user.username, "Login failed: wrong password");
        return Err(AppError::invalid_credentials().into());
    }
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(ApiResponse::success(issue_token(&state, user)?))
}

/// POST /api/auth/logout: revoke the presented token
pub async fn logout(user: CurrentUser, State(state): State<AppState>) -> ApiResult<()> {
    state.jwt.revoke(&user.claims);
    tracing::info!(user_id = user.id, "User logged out");
    Ok(ApiResponse::ok())
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser, State(state): State<AppState>) -> ApiResult<User> {
    Ok(ApiResponse::success(load_active(&state, &user).await?))
}

/// PUT /api/auth/me
pub async fn update_me(
    caller: CurrentUser,
    State(state): State<AppState>,
    Json(mut req): Json<UserUpdate>,
) -> ApiResult<User> {
    req.email = req.email.map(|e| e.trim().to_lowercase());
    req.validate()?;
    load_active(&state, &caller).await?;

    let user = db::users::update_profile(&state.pool, caller.id, &req)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/me/password
pub async fn change_password(
    caller: CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<PasswordChange>,
) -> ApiResult<()> {
    let user = load_active(&state, &caller).await?;

    let hasher = state.hasher.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<User, AppError> {
        let mut user = user;
        if !user.check_password(&*hasher, &req.current_password) {
            return Err(AppError::invalid_credentials());
        }
        user.set_password(&*hasher, &req.new_password)?;
        Ok(user)
    })
    .await
    .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))??;

    db::users::update_password(&state.pool, user.id, &user.password_hash).await?;
    tracing::info!(user_id = user.id, "Password changed");
    Ok(ApiResponse::ok())
}
