//! Auth handlers: login, refresh, logout, me.

use axum::Json;
use axum::extract::State;

use rolegate_entity::permission::UserProfile;

use crate::dto::request::{LoginRequest, RefreshRequest};
use crate::dto::response::{LoginResponse, MessageResponse, RefreshResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, BearerToken, ValidatedJson};
use crate::state::AppState;

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state.sessions.login(&req.identifier, &req.password).await?;
    Ok(Json(LoginResponse::from(outcome)))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let access = state.sessions.refresh(&req.refresh_token).await?;
    Ok(Json(RefreshResponse {
        access_token: access.token,
    }))
}

/// POST /auth/logout
///
/// Takes the raw bearer token rather than `AuthUser` so that logging out
/// twice with the same token succeeds.
pub async fn logout(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.logout(token.as_str()).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.sessions.profile(auth.user_id).await?;
    Ok(Json(profile))
}
