//! Authentication routes: register, login, refresh, logout, profile.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserResponse,
};
use crate::services::auth as auth_service;
use crate::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let auth = auth_service::register(state.store.as_ref(), &body, &state.config).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth = auth_service::login(state.store.as_ref(), &body, &state.config).await?;
    Ok(Json(auth))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth =
        auth_service::refresh(state.store.as_ref(), &body.refresh_token, &state.config).await?;
    Ok(Json(auth))
}

/// POST /auth/logout — client-side token discard (stateless JWT)
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}

/// GET /auth/me — current user profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service::find_user_by_id(state.store.as_ref(), current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
