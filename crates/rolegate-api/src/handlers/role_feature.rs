//! Role/feature grant handlers. Grants belong to roles, so they share
//! the `roles` menu.

use axum::Json;
use axum::extract::{Path, State};

use rolegate_entity::grant::RoleFeature;
use rolegate_entity::permission::Action;

use crate::dto::request::UpdateRoleFeatureRequest;
use crate::error::ApiError;
use crate::extractors::path::parse_uuid;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::handlers::menu;
use crate::state::AppState;

/// GET /role-features
pub async fn list_role_features(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RoleFeature>>, ApiError> {
    auth.require(&state, menu::ROLES, Action::View).await?;
    let grants = state.role_feature_service.list_role_features().await?;
    Ok(Json(grants))
}

/// PUT /role-features/{id}
pub async fn update_role_feature(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRoleFeatureRequest>,
) -> Result<Json<RoleFeature>, ApiError> {
    let id = parse_uuid(&id)?;
    let ctx = auth.require(&state, menu::ROLES, Action::Edit).await?;
    let grant = state
        .role_feature_service
        .update_role_feature(&ctx, id, req.into())
        .await?;
    Ok(Json(grant))
}
