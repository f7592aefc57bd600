//! Cached user lookups and updates.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use rolegate_auth::{PasswordHasher, PasswordPolicy, PermissionResolver};
use rolegate_cache::{CacheAside, keys};
use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageRequest, PageResponse};
use rolegate_database::UserStore;
use rolegate_entity::role::Role;
use rolegate_entity::user::{UpdateUser, User, UserFilter};

use crate::context::RequestContext;
use crate::refill::refill;

/// Users as seen by the admin screens. Password hashes are skipped on
/// serialization, so they reach neither the cache nor the wire.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    resolver: Arc<PermissionResolver>,
    cache: CacheAside,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    deadline: Duration,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        resolver: Arc<PermissionResolver>,
        cache: CacheAside,
        hasher: PasswordHasher,
        policy: PasswordPolicy,
        deadline: Duration,
    ) -> Self {
        Self {
            users,
            resolver,
            cache,
            hasher,
            policy,
            deadline,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.resolver
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.cache
            .fetch(keys::USERS_LIST, || {
                bounded(self.deadline, "user list", self.users.list())
            })
            .await
    }

    /// One page of the users matching `filter`, cut from the cached list.
    pub async fn list_users_page(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let matching = self
            .list_users()
            .await?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        Ok(PageResponse::slice(matching, page))
    }

    /// Set a new password for user `id`.
    ///
    /// Anyone may change their own password. Changing someone else's
    /// requires a role at or above theirs.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        if new_password != confirm_password {
            return Err(AppError::validation(
                "New password and confirmation do not match",
            ));
        }
        self.policy.validate(new_password)?;

        // The cached copy has no hash; read the row.
        let target = bounded(self.deadline, "user lookup", self.users.find_by_id(id))
            .await?
            .filter(|u| u.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        if target.id != ctx.user_id {
            let level = self.level_of(target.role_id).await?;
            if !ctx.outranks_or_equals(level) {
                return Err(AppError::forbidden(
                    "Cannot change the password of a user with a higher role level",
                ));
            }
        }

        if self.hasher.verify(new_password, &target.password)? {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }

        let hash = self.hasher.hash(new_password)?;
        let updated = bounded(
            self.deadline,
            "password update",
            self.users.update_password(id, &hash, ctx.user_id),
        )
        .await?;
        if !updated {
            return Err(AppError::not_found(format!("User {id} not found")));
        }

        self.cache
            .invalidate(&[&keys::user(id), keys::USERS_LIST])
            .await?;

        info!(user_id = %id, actor = %ctx.user_id, "Password changed");
        Ok(())
    }

    /// Apply a partial update.
    ///
    /// The actor may not touch a user whose role outranks their own, nor
    /// hand out a role that does.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateUser,
    ) -> AppResult<User> {
        if data.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }

        let target = self.get_user(id).await?;
        let current_level = self.level_of(target.role_id).await?;
        if !ctx.outranks_or_equals(current_level) {
            return Err(AppError::forbidden(
                "Cannot modify a user with a higher role level",
            ));
        }
        if let Some(role_id) = data.role_id {
            let new_level = self
                .resolver
                .resolve_role(role_id)
                .await?
                .map(|r| r.role.level)
                .ok_or_else(|| AppError::validation(format!("Role {role_id} does not exist")))?;
            if !ctx.outranks_or_equals(new_level) {
                return Err(AppError::forbidden(
                    "Cannot assign a role above your own level",
                ));
            }
        }

        let updated = bounded(
            self.deadline,
            "user update",
            self.users.update(id, &data, ctx.user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        let user_key = keys::user(id);
        // Role user counts change when a user moves or is deactivated.
        self.cache
            .invalidate(&[&user_key, keys::USERS_LIST, keys::ROLES_LIST])
            .await?;
        self.cache.prime(&user_key, &updated).await;
        refill(keys::USERS_LIST, self.list_users()).await;

        info!(user_id = %id, actor = %ctx.user_id, "User updated");
        Ok(updated)
    }

    async fn level_of(&self, role_id: Option<Uuid>) -> AppResult<i32> {
        let Some(role_id) = role_id else {
            return Ok(Role::MIN_LEVEL);
        };
        Ok(self
            .resolver
            .resolve_role(role_id)
            .await?
            .map_or(Role::MIN_LEVEL, |r| r.role.level))
    }
}
