//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[cfg(feature = "memory")]
use rolegate_core::config::cache::MemoryCacheConfig;
use rolegate_core::config::cache::CacheConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;

/// Cache manager that wraps the configured cache provider.
///
/// The provider is selected at construction time based on configuration.
/// Revocation entries live in their own provider: the in-memory entity
/// cache is bounded and may evict early, which a blocklist must never do.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider for entities and list aggregates.
    inner: Arc<dyn CacheProvider>,
    /// Holds `block:<token>` entries. Never evicts before the entry's TTL.
    revocations: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Ok(Self::from_provider(Arc::new(
                    crate::redis::RedisCacheProvider::new(client),
                )))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!(
                    max_capacity = config.memory.max_capacity,
                    "Initializing in-memory cache provider"
                );
                Ok(Self::in_memory(&config.memory))
            }
            other => Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'. Supported: memory, redis"
            ))),
        }
    }

    /// In-process caches: a bounded moka cache for entities and an
    /// unbounded one, expiring by TTL only, for revocation entries.
    #[cfg(feature = "memory")]
    pub fn in_memory(config: &MemoryCacheConfig) -> Self {
        Self::from_providers(
            Arc::new(crate::memory::MemoryCacheProvider::new(config)),
            Arc::new(crate::memory::MemoryCacheProvider::unbounded()),
        )
    }

    /// Create a cache manager that uses one provider for everything.
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self {
            revocations: Arc::clone(&provider),
            inner: provider,
        }
    }

    pub fn from_providers(
        entities: Arc<dyn CacheProvider>,
        revocations: Arc<dyn CacheProvider>,
    ) -> Self {
        Self {
            inner: entities,
            revocations,
        }
    }

    /// The provider holding revocation entries.
    pub fn revocations(&self) -> &dyn CacheProvider {
        self.revocations.as_ref()
    }

    /// Set a typed value by serializing to JSON.
    pub async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.inner.set(key, &json, ttl).await
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.inner.health_check().await? && self.revocations.health_check().await?)
    }
}
