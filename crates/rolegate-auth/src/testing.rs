//! Failing backends for exercising error paths in tests.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;
use rolegate_database::memory::MemoryStore;
use rolegate_database::{AuthorizationStore, UserStore};
use rolegate_entity::authorization::Authorization;
use rolegate_entity::user::{UpdateUser, User};

/// Every call fails.
#[derive(Debug)]
pub(crate) struct UnreachableCache;

#[async_trait]
impl CacheProvider for UnreachableCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::upstream("cache unreachable"))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::upstream("cache unreachable"))
    }
    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::upstream("cache unreachable"))
    }
    async fn exists(&self, _key: &str) -> AppResult<bool> {
        Err(AppError::upstream("cache unreachable"))
    }
    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::upstream("cache unreachable"))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    /// Return `UpstreamStoreFailure` at once.
    Fail,
    /// Never answer within any deadline.
    Stall,
}

/// A [`MemoryStore`] whose user and session calls misbehave.
#[derive(Debug, Clone)]
pub(crate) struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
}

impl FaultyStore {
    pub(crate) fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self { inner, fault }
    }

    async fn trip(&self) -> AppResult<()> {
        match self.fault {
            Fault::Fail => Err(AppError::upstream("store unreachable")),
            Fault::Stall => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl UserStore for FaultyStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.trip().await?;
        UserStore::find_by_email(&self.inner, email).await
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        self.trip().await?;
        UserStore::find_by_phone(&self.inner, phone_number).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.trip().await?;
        UserStore::find_by_id(&self.inner, id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        self.trip().await?;
        UserStore::list(&self.inner).await
    }

    async fn update(&self, id: Uuid, data: &UpdateUser, actor: Uuid) -> AppResult<Option<User>> {
        self.trip().await?;
        UserStore::update(&self.inner, id, data, actor).await
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        actor: Uuid,
    ) -> AppResult<bool> {
        self.trip().await?;
        UserStore::update_password(&self.inner, id, password_hash, actor).await
    }
}

#[async_trait]
impl AuthorizationStore for FaultyStore {
    async fn upsert(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<Authorization> {
        self.trip().await?;
        AuthorizationStore::upsert(&self.inner, user_id, access_token, refresh_token).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Authorization>> {
        self.trip().await?;
        AuthorizationStore::find_by_user(&self.inner, user_id).await
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<Option<Authorization>> {
        self.trip().await?;
        AuthorizationStore::find_by_refresh_token(&self.inner, refresh_token).await
    }

    async fn update_access_token(&self, user_id: Uuid, access_token: &str) -> AppResult<bool> {
        self.trip().await?;
        AuthorizationStore::update_access_token(&self.inner, user_id, access_token).await
    }

    async fn clear_tokens(&self, user_id: Uuid) -> AppResult<()> {
        self.trip().await?;
        AuthorizationStore::clear_tokens(&self.inner, user_id).await
    }
}
