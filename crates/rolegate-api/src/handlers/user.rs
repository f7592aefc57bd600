//! User administration handlers, gated on the `users` menu.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use rolegate_core::types::PageResponse;
use rolegate_entity::permission::Action;
use rolegate_entity::user::User;

use crate::dto::request::{ChangePasswordRequest, UpdateUserRequest, UserListQuery};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::handlers::menu;
use crate::state::AppState;

/// GET /users?page=&size=&roleId=&isActive=&phoneNumber=&fullName=
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> Result<Json<PageResponse<User>>, ApiError> {
    let Query(query) = query?;
    auth.require(&state, menu::USERS, Action::View).await?;
    let (filter, page) = query.into_parts();
    let users = state.user_service.list_users_page(&filter, page).await?;
    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_uuid(&id)?;
    auth.require(&state, menu::USERS, Action::View).await?;
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let id = parse_uuid(&id)?;
    let ctx = auth.require(&state, menu::USERS, Action::Edit).await?;
    let user = state.user_service.update_user(&ctx, id, req.into()).await?;
    Ok(Json(user))
}

/// PUT /users/{id}/password
///
/// Callers may always change their own password. Changing another
/// user's needs `users` edit rights.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    let ctx = if id == auth.user_id {
        auth.context(&state).await?
    } else {
        auth.require(&state, menu::USERS, Action::Edit).await?
    };
    state
        .user_service
        .change_password(&ctx, id, &req.new_password, &req.confirm_new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
