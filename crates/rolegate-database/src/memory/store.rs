//! In-memory implementation of every store trait, backed by `dashmap`.
//!
//! Each operation touches a map shard for the duration of a synchronous
//! closure only; nothing is held across an await point. Feature
//! attachment is tracked apart from grant rows so that a role can
//! reference a feature it holds no grant for.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_entity::authorization::Authorization;
use rolegate_entity::feature::Feature;
use rolegate_entity::grant::{PermissionFlags, RoleFeature};
use rolegate_entity::role::{Role, RoleSummary, UpdateRole};
use rolegate_entity::user::{UpdateUser, User};

use crate::store::{
    AuthorizationStore, FeatureStore, GrantStore, RoleStore, RoleWithFeatures, StoreHealth,
    UserStore,
};

/// Shared in-memory tables. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<Uuid, User>>,
    roles: Arc<DashMap<Uuid, Role>>,
    features: Arc<DashMap<Uuid, Feature>>,
    grants: Arc<DashMap<Uuid, RoleFeature>>,
    /// Role id to attached feature ids.
    attachments: Arc<DashMap<Uuid, HashSet<Uuid>>>,
    /// Session rows keyed by user id.
    authorizations: Arc<DashMap<Uuid, Authorization>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert or replace a role.
    pub fn insert_role(&self, role: Role) {
        self.roles.insert(role.id, role);
    }

    /// Insert or replace a feature.
    pub fn insert_feature(&self, feature: Feature) {
        self.features.insert(feature.id, feature);
    }

    /// Insert a grant and attach its feature to its role.
    pub fn insert_grant(&self, grant: RoleFeature) {
        self.attach_feature(grant.role_id, grant.feature_id);
        self.grants.insert(grant.id, grant);
    }

    /// Attach a feature to a role without writing a grant row.
    pub fn attach_feature(&self, role_id: Uuid, feature_id: Uuid) {
        self.attachments
            .entry(role_id)
            .or_default()
            .insert(feature_id);
    }

    /// Remove a grant row but leave the feature attached.
    pub fn remove_grant(&self, role_id: Uuid, feature_id: Uuid) {
        self.grants
            .retain(|_, g| !(g.role_id == role_id && g.feature_id == feature_id));
    }

    /// Number of session rows held for a user.
    pub fn session_count(&self, user_id: Uuid) -> usize {
        self.authorizations
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .count()
    }

    fn find_user(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.value().deleted_at.is_none() && predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn live_role(&self, id: Uuid) -> Option<Role> {
        self.roles
            .get(&id)
            .filter(|role| role.deleted_at.is_none())
            .map(|role| role.value().clone())
    }

    fn upsert_grant(&self, role_id: Uuid, feature_id: Uuid, flags: PermissionFlags) {
        let now = Utc::now();
        let existing = self
            .grants
            .iter()
            .find(|entry| entry.role_id == role_id && entry.feature_id == feature_id)
            .map(|entry| *entry.key());

        match existing.and_then(|id| self.grants.get_mut(&id)) {
            Some(mut grant) => {
                grant.set_flags(flags);
                grant.updated_at = now;
            }
            None => {
                self.insert_grant(super::fixtures::grant(role_id, feature_id, flags));
            }
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_user(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        Ok(self.find_user(|u| u.phone_number == phone_number))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.find_user(|u| u.id == id))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, id: Uuid, data: &UpdateUser, actor: Uuid) -> AppResult<Option<User>> {
        if let Some(role_id) = data.role_id {
            if self.live_role(role_id).is_none() {
                return Err(AppError::validation(
                    "Failed to update user: referenced row does not exist",
                ));
            }
        }

        let Some(mut user) = self.users.get_mut(&id).filter(|u| u.deleted_at.is_none()) else {
            return Ok(None);
        };
        data.apply_to(user.value_mut());
        user.updated_at = Utc::now();
        user.updated_by = Some(actor);
        Ok(Some(user.value().clone()))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        actor: Uuid,
    ) -> AppResult<bool> {
        let Some(mut user) = self.users.get_mut(&id).filter(|u| u.deleted_at.is_none()) else {
            return Ok(false);
        };
        user.password = password_hash.to_string();
        user.updated_at = Utc::now();
        user.updated_by = Some(actor);
        Ok(true)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.live_role(id))
    }

    async fn find_with_features(&self, id: Uuid) -> AppResult<Option<RoleWithFeatures>> {
        let Some(role) = self.live_role(id) else {
            return Ok(None);
        };

        let attached: Vec<Uuid> = self
            .attachments
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut features: Vec<Feature> = attached
            .into_iter()
            .filter_map(|feature_id| self.features.get(&feature_id).map(|f| f.value().clone()))
            .filter(|f| f.deleted_at.is_none())
            .collect();
        features.sort_by(|a, b| {
            a.menu_seq_no
                .cmp(&b.menu_seq_no)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(Some(RoleWithFeatures { role, features }))
    }

    async fn list_summaries(&self) -> AppResult<Vec<RoleSummary>> {
        let mut summaries: Vec<RoleSummary> = self
            .roles
            .iter()
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| {
                let role = entry.value();
                let number_user = self
                    .users
                    .iter()
                    .filter(|u| u.deleted_at.is_none() && u.role_id == Some(role.id))
                    .count() as i64;
                RoleSummary {
                    role_id: role.id,
                    role_name: role.name.clone(),
                    role_level: role.level,
                    number_user,
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.role_level
                .cmp(&a.role_level)
                .then_with(|| a.role_name.cmp(&b.role_name))
        });
        Ok(summaries)
    }

    async fn update(&self, id: Uuid, data: &UpdateRole, actor: Uuid) -> AppResult<Option<Role>> {
        if self.live_role(id).is_none() {
            return Ok(None);
        }
        if let Some(name) = &data.name {
            let taken = self
                .roles
                .iter()
                .any(|r| r.id != id && r.deleted_at.is_none() && &r.name == name);
            if taken {
                return Err(AppError::conflict("Failed to update role: duplicate value"));
            }
        }
        for change in &data.grants {
            if !self.features.contains_key(&change.feature_id) {
                return Err(AppError::validation(
                    "Failed to write role grant: referenced row does not exist",
                ));
            }
        }

        let updated = {
            let Some(mut role) = self.roles.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(name) = &data.name {
                role.name = name.clone();
            }
            if let Some(level) = data.level {
                role.level = level;
            }
            role.updated_at = Utc::now();
            role.updated_by = Some(actor);
            role.value().clone()
        };

        for change in &data.grants {
            self.upsert_grant(id, change.feature_id, change.flags);
        }

        Ok(Some(updated))
    }
}

#[async_trait]
impl FeatureStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Feature>> {
        Ok(self
            .features
            .get(&id)
            .filter(|f| f.deleted_at.is_none())
            .map(|f| f.value().clone()))
    }

    async fn list(&self) -> AppResult<Vec<Feature>> {
        let mut features: Vec<Feature> = self
            .features
            .iter()
            .filter(|entry| entry.deleted_at.is_none())
            .map(|entry| entry.value().clone())
            .collect();
        features.sort_by(|a, b| {
            a.menu_seq_no
                .cmp(&b.menu_seq_no)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(features)
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RoleFeature>> {
        Ok(self.grants.get(&id).map(|g| g.value().clone()))
    }

    async fn find_by_role(&self, role_id: Uuid) -> AppResult<Vec<RoleFeature>> {
        Ok(self
            .grants
            .iter()
            .filter(|entry| entry.role_id == role_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn list(&self) -> AppResult<Vec<RoleFeature>> {
        let mut grants: Vec<RoleFeature> =
            self.grants.iter().map(|entry| entry.value().clone()).collect();
        grants.sort_by(|a, b| {
            a.role_id
                .cmp(&b.role_id)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(grants)
    }

    async fn update_flags(
        &self,
        id: Uuid,
        flags: PermissionFlags,
        _actor: Uuid,
    ) -> AppResult<Option<RoleFeature>> {
        Ok(self.grants.get_mut(&id).map(|mut grant| {
            grant.set_flags(flags);
            grant.updated_at = Utc::now();
            grant.value().clone()
        }))
    }
}

#[async_trait]
impl AuthorizationStore for MemoryStore {
    async fn upsert(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<Authorization> {
        let now = Utc::now();
        let row = self
            .authorizations
            .entry(user_id)
            .and_modify(|row| {
                row.access_token = Some(access_token.to_string());
                row.refresh_token = Some(refresh_token.to_string());
                row.updated_at = now;
            })
            .or_insert_with(|| Authorization {
                id: Uuid::now_v7(),
                user_id,
                access_token: Some(access_token.to_string()),
                refresh_token: Some(refresh_token.to_string()),
                created_at: now,
                updated_at: now,
            })
            .value()
            .clone();
        Ok(row)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Authorization>> {
        Ok(self.authorizations.get(&user_id).map(|row| row.value().clone()))
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<Option<Authorization>> {
        Ok(self
            .authorizations
            .iter()
            .find(|entry| entry.refresh_token.as_deref() == Some(refresh_token))
            .map(|entry| entry.value().clone()))
    }

    async fn update_access_token(&self, user_id: Uuid, access_token: &str) -> AppResult<bool> {
        Ok(self
            .authorizations
            .get_mut(&user_id)
            .map(|mut row| {
                row.access_token = Some(access_token.to_string());
                row.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn clear_tokens(&self, user_id: Uuid) -> AppResult<()> {
        if let Some(mut row) = self.authorizations.get_mut(&user_id) {
            row.access_token = None;
            row.refresh_token = None;
            row.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
