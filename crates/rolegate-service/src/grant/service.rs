//! Cached grant list and single-grant flag updates.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use rolegate_auth::PermissionResolver;
use rolegate_cache::{CacheAside, keys};
use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::GrantStore;
use rolegate_entity::grant::{PermissionFlags, RoleFeature};

use crate::context::RequestContext;
use crate::refill::refill;

#[derive(Debug, Clone)]
pub struct RoleFeatureService {
    grants: Arc<dyn GrantStore>,
    resolver: Arc<PermissionResolver>,
    cache: CacheAside,
    deadline: Duration,
}

impl RoleFeatureService {
    pub fn new(
        grants: Arc<dyn GrantStore>,
        resolver: Arc<PermissionResolver>,
        cache: CacheAside,
        deadline: Duration,
    ) -> Self {
        Self {
            grants,
            resolver,
            cache,
            deadline,
        }
    }

    pub async fn list_role_features(&self) -> AppResult<Vec<RoleFeature>> {
        self.cache
            .fetch(keys::ROLE_FEATURE_LIST, || {
                bounded(self.deadline, "grant list", self.grants.list())
            })
            .await
    }

    /// Overwrite one grant's flags. The actor must rank at least as high
    /// as the role holding the grant.
    pub async fn update_role_feature(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<RoleFeature> {
        let grant = bounded(self.deadline, "grant lookup", self.grants.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role feature {id} not found")))?;

        let role = self
            .resolver
            .find_role(grant.role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {} not found", grant.role_id)))?;
        if !ctx.outranks_or_equals(role.level) {
            return Err(AppError::forbidden(
                "Cannot change grants of a role above your own level",
            ));
        }

        let updated = bounded(
            self.deadline,
            "grant update",
            self.grants.update_flags(id, flags, ctx.user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role feature {id} not found")))?;

        let role_key = keys::role(updated.role_id);
        self.cache
            .invalidate(&[keys::ROLE_FEATURE_LIST, &role_key])
            .await?;
        refill(&role_key, self.resolver.resolve_role(updated.role_id)).await;
        refill(keys::ROLE_FEATURE_LIST, self.list_role_features()).await;

        info!(
            grant_id = %id,
            role_id = %updated.role_id,
            actor = %ctx.user_id,
            "Role feature updated"
        );
        Ok(updated)
    }
}
