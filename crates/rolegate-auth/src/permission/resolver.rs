//! Merges a role's attached features with its grant rows.
//!
//! Every feature attached to a role must have a grant row for that
//! role. A missing row is reported as
//! `PermissionResolutionInconsistency` on every path; flags are never
//! defaulted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};
use uuid::Uuid;

use rolegate_cache::{CacheAside, keys};
use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::{GrantStore, RoleStore, RoleWithFeatures, UserStore};
use rolegate_entity::feature::Feature;
use rolegate_entity::grant::RoleFeature;
use rolegate_entity::permission::{Action, FeaturePermission, RolePermissions, UserProfile};
use rolegate_entity::role::Role;
use rolegate_entity::user::User;

/// A caller who passed a permission check.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub user: User,
    pub role: Option<Role>,
}

impl Authorized {
    /// The caller's role level, or the minimum when they hold no role.
    pub fn role_level(&self) -> i32 {
        self.role.as_ref().map_or(Role::MIN_LEVEL, |r| r.level)
    }
}

/// Resolves users and roles to permission lists, through the cache.
///
/// Resolved roles are cached under `role:<id>` and users under
/// `user:<id>`, the same keys the entity services invalidate on write.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    grants: Arc<dyn GrantStore>,
    cache: CacheAside,
    deadline: Duration,
}

impl PermissionResolver {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        grants: Arc<dyn GrantStore>,
        cache: CacheAside,
        deadline: Duration,
    ) -> Self {
        Self {
            users,
            roles,
            grants,
            cache,
            deadline,
        }
    }

    /// Merge `features` with the grants `role_id` holds on them, ordered
    /// by menu sequence then name.
    pub fn merge(
        role_id: Uuid,
        features: &[Feature],
        grants: &[RoleFeature],
    ) -> AppResult<Vec<FeaturePermission>> {
        let by_feature: HashMap<Uuid, &RoleFeature> = grants
            .iter()
            .filter(|g| g.role_id == role_id)
            .map(|g| (g.feature_id, g))
            .collect();

        let mut permissions = features
            .iter()
            .map(|feature| {
                by_feature
                    .get(&feature.id)
                    .map(|grant| FeaturePermission::merge(feature, grant))
                    .ok_or_else(|| {
                        AppError::permission_inconsistency(format!(
                            "Role {role_id} has feature {} ('{}') attached without a grant",
                            feature.id, feature.menu_slug
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        permissions.sort_by(|a, b| {
            a.menu_seq_no
                .cmp(&b.menu_seq_no)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(permissions)
    }

    /// A role and its permissions, or `None` if the role does not exist.
    pub async fn resolve_role(&self, role_id: Uuid) -> AppResult<Option<RolePermissions>> {
        self.cache
            .fetch_optional(&keys::role(role_id), || self.load_role(role_id))
            .await
    }

    /// The bare role row, without resolving its grants.
    pub async fn find_role(&self, role_id: Uuid) -> AppResult<Option<Role>> {
        bounded(self.deadline, "role lookup", self.roles.find_by_id(role_id)).await
    }

    /// The user's role and permissions. Users without a role, or whose
    /// role has been deleted, resolve to `None`.
    pub async fn resolve_for_user(&self, user: &User) -> AppResult<Option<RolePermissions>> {
        let Some(role_id) = user.role_id else {
            return Ok(None);
        };

        let resolved = self.resolve_role(role_id).await?;
        if resolved.is_none() {
            warn!(user_id = %user.id, role_id = %role_id, "User references a missing role");
        }
        Ok(resolved)
    }

    /// The profile returned by login and `/auth/me`.
    pub async fn profile(&self, user: &User) -> AppResult<UserProfile> {
        let resolved = self.resolve_for_user(user).await?;
        Ok(UserProfile::new(user, resolved))
    }

    /// Load a user through the cache. The cached copy carries no password hash.
    pub async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.cache
            .fetch_optional(&keys::user(user_id), || {
                bounded(self.deadline, "user lookup", self.users.find_by_id(user_id))
            })
            .await
    }

    /// Fail with `Forbidden` unless the user's role grants `action` on the
    /// feature with slug `menu_slug`.
    pub async fn require(
        &self,
        user_id: Uuid,
        menu_slug: &str,
        action: Action,
    ) -> AppResult<Authorized> {
        let (user, resolved) = self.load_caller(user_id).await?;
        let allowed = resolved
            .as_ref()
            .and_then(|r| r.permissions.iter().find(|p| p.menu_slug == menu_slug))
            .is_some_and(|p| p.is_active && p.flags.allows(action));

        if !allowed {
            return Err(AppError::forbidden(format!(
                "'{action}' on '{menu_slug}' is not granted"
            )));
        }

        Ok(Authorized {
            user,
            role: resolved.map(|r| r.role),
        })
    }

    /// The caller with their role, for operations any active user may
    /// perform on themselves.
    pub async fn authorize(&self, user_id: Uuid) -> AppResult<Authorized> {
        let (user, resolved) = self.load_caller(user_id).await?;
        Ok(Authorized {
            user,
            role: resolved.map(|r| r.role),
        })
    }

    async fn load_caller(&self, user_id: Uuid) -> AppResult<(User, Option<RolePermissions>)> {
        let user = self
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;
        if !user.can_login() {
            return Err(AppError::account_deactivated());
        }
        let resolved = self.resolve_for_user(&user).await?;
        Ok((user, resolved))
    }

    async fn load_role(&self, role_id: Uuid) -> AppResult<Option<RolePermissions>> {
        let loaded = bounded(
            self.deadline,
            "role lookup",
            self.roles.find_with_features(role_id),
        )
        .await?;
        let Some(RoleWithFeatures { role, features }) = loaded else {
            return Ok(None);
        };

        let grants = bounded(
            self.deadline,
            "grant lookup",
            self.grants.find_by_role(role_id),
        )
        .await?;

        let permissions = Self::merge(role.id, &features, &grants).inspect_err(|e| {
            error!(role_id = %role_id, error = %e, "Permission resolution failed");
        })?;

        Ok(Some(RolePermissions { role, permissions }))
    }
}
