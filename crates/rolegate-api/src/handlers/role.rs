//! Role administration handlers, gated on the `roles` menu.

use axum::Json;
use axum::extract::{Path, State};

use rolegate_entity::permission::{Action, RolePermissions};
use rolegate_entity::role::RoleSummary;

use crate::dto::request::UpdateRoleRequest;
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::handlers::menu;
use crate::state::AppState;

/// GET /roles
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RoleSummary>>, ApiError> {
    auth.require(&state, menu::ROLES, Action::View).await?;
    let roles = state.role_service.list_roles().await?;
    Ok(Json(roles))
}

/// GET /roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RolePermissions>, ApiError> {
    let id = parse_uuid(&id)?;
    auth.require(&state, menu::ROLES, Action::View).await?;
    let role = state.role_service.get_role(id).await?;
    Ok(Json(role))
}

/// PUT /roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> Result<Json<RolePermissions>, ApiError> {
    let id = parse_uuid(&id)?;
    let ctx = auth.require(&state, menu::ROLES, Action::Edit).await?;
    let role = state.role_service.update_role(&ctx, id, req.into()).await?;
    Ok(Json(role))
}
