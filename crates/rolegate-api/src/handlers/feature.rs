//! Feature (menu) handlers. Read-only.

use axum::Json;
use axum::extract::{Path, State};

use rolegate_entity::feature::Feature;
use rolegate_entity::permission::Action;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::path::parse_uuid;
use crate::handlers::menu;
use crate::state::AppState;

/// GET /features
pub async fn list_features(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Feature>>, ApiError> {
    auth.require(&state, menu::FEATURES, Action::View).await?;
    let features = state.feature_service.list_features().await?;
    Ok(Json(features))
}

/// GET /features/{id}
pub async fn get_feature(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Feature>, ApiError> {
    let id = parse_uuid(&id)?;
    auth.require(&state, menu::FEATURES, Action::View).await?;
    let feature = state.feature_service.get_feature(id).await?;
    Ok(Json(feature))
}
