//! Cached role lookups and the guarded role update.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use rolegate_auth::PermissionResolver;
use rolegate_cache::{CacheAside, keys};
use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::RoleStore;
use rolegate_entity::permission::RolePermissions;
use rolegate_entity::role::{RoleSummary, UpdateRole};

use crate::context::RequestContext;
use crate::refill::refill;

#[derive(Debug, Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleStore>,
    resolver: Arc<PermissionResolver>,
    cache: CacheAside,
    deadline: Duration,
}

impl RoleService {
    pub fn new(
        roles: Arc<dyn RoleStore>,
        resolver: Arc<PermissionResolver>,
        cache: CacheAside,
        deadline: Duration,
    ) -> Self {
        Self {
            roles,
            resolver,
            cache,
            deadline,
        }
    }

    /// A role with its resolved permissions.
    pub async fn get_role(&self, id: Uuid) -> AppResult<RolePermissions> {
        self.resolver
            .resolve_role(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))
    }

    /// Every role with its user count, highest level first.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleSummary>> {
        self.cache
            .fetch(keys::ROLES_LIST, || {
                bounded(self.deadline, "role list", self.roles.list_summaries())
            })
            .await
    }

    /// Update name, level and grants.
    ///
    /// Rejected with `Forbidden` when the actor's level is below the
    /// role's current level or the requested one.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateRole,
    ) -> AppResult<RolePermissions> {
        data.validate()?;

        // The bare row, so a role whose grants are inconsistent can still
        // be repaired by this update.
        let current = bounded(self.deadline, "role lookup", self.roles.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;
        let highest = data.level.unwrap_or(current.level).max(current.level);
        if !ctx.outranks_or_equals(highest) {
            return Err(AppError::forbidden(
                "Cannot modify a role above your own level",
            ));
        }

        bounded(
            self.deadline,
            "role update",
            self.roles.update(id, &data, ctx.user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;

        let role_key = keys::role(id);
        self.cache
            .invalidate(&[&role_key, keys::ROLES_LIST, keys::ROLE_FEATURE_LIST])
            .await?;

        // Re-read through the cache so the entry is repopulated.
        let updated = self.get_role(id).await?;
        refill(keys::ROLES_LIST, self.list_roles()).await;

        info!(
            role_id = %id,
            actor = %ctx.user_id,
            grants = data.grants.len(),
            "Role updated"
        );
        Ok(updated)
    }
}
