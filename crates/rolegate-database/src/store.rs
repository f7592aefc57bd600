//! Credential store contracts.
//!
//! Services depend on these traits rather than on a concrete backend, so
//! the PostgreSQL repositories and the in-memory store are
//! interchangeable. Every implementation reports an unreachable backend
//! as `UpstreamStoreFailure` and a missing row as `Ok(None)`.

use async_trait::async_trait;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::authorization::Authorization;
use rolegate_entity::feature::Feature;
use rolegate_entity::grant::{PermissionFlags, RoleFeature};
use rolegate_entity::role::{Role, RoleSummary, UpdateRole};
use rolegate_entity::user::{UpdateUser, User};

/// A role loaded together with the features attached to it.
#[derive(Debug, Clone)]
pub struct RoleWithFeatures {
    pub role: Role,
    /// Attached, non-deleted features.
    pub features: Vec<Feature>,
}

/// User lookups and updates. Soft-deleted users are invisible.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Apply a partial update. Returns `None` if the user does not exist.
    async fn update(&self, id: Uuid, data: &UpdateUser, actor: Uuid) -> AppResult<Option<User>>;

    /// Replace the stored password hash. Returns `false` if the user does
    /// not exist.
    async fn update_password(&self, id: Uuid, password_hash: &str, actor: Uuid)
    -> AppResult<bool>;
}

/// Role lookups and updates. Soft-deleted roles are invisible.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Load a role and its attached features in one round trip.
    async fn find_with_features(&self, id: Uuid) -> AppResult<Option<RoleWithFeatures>>;

    /// Every role with its user count.
    async fn list_summaries(&self) -> AppResult<Vec<RoleSummary>>;

    /// Update name/level and upsert the listed grants as one unit.
    /// Returns `None` if the role does not exist.
    async fn update(&self, id: Uuid, data: &UpdateRole, actor: Uuid) -> AppResult<Option<Role>>;
}

/// Feature lookups.
#[async_trait]
pub trait FeatureStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Feature>>;

    /// All non-deleted features ordered by menu sequence.
    async fn list(&self) -> AppResult<Vec<Feature>>;
}

/// RoleFeature grant lookups and updates.
#[async_trait]
pub trait GrantStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RoleFeature>>;

    /// Every grant held by a role.
    async fn find_by_role(&self, role_id: Uuid) -> AppResult<Vec<RoleFeature>>;

    async fn list(&self) -> AppResult<Vec<RoleFeature>>;

    /// Overwrite the flags of one grant. Returns `None` if it does not exist.
    async fn update_flags(
        &self,
        id: Uuid,
        flags: PermissionFlags,
        actor: Uuid,
    ) -> AppResult<Option<RoleFeature>>;
}

/// The per-user session row holding the latest token pair.
#[async_trait]
pub trait AuthorizationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert the row for `user_id`, or replace both tokens if it exists.
    /// Must be atomic: concurrent calls for one user leave exactly one row.
    async fn upsert(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<Authorization>;

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Authorization>>;

    /// Find the row currently holding `refresh_token`. Cleared rows never match.
    async fn find_by_refresh_token(&self, refresh_token: &str)
    -> AppResult<Option<Authorization>>;

    /// Replace only the access token. Returns `false` if the user has no row.
    async fn update_access_token(&self, user_id: Uuid, access_token: &str) -> AppResult<bool>;

    /// Blank both tokens. Clearing a missing or already-cleared row is a no-op.
    async fn clear_tokens(&self, user_id: Uuid) -> AppResult<()>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync + std::fmt::Debug + 'static {
    async fn ping(&self) -> AppResult<()>;
}
