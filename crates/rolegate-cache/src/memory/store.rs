//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use rolegate_core::config::cache::MemoryCacheConfig;
use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;

/// A cached value and the TTL it was written with.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after its own TTL, restarting on overwrite.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    /// A cache with no size bound. Entries leave only when their TTL runs
    /// out, never to make room.
    pub fn unbounded() -> Self {
        let cache = Cache::builder().expire_after(PerEntryTtl).build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            self.cache.remove(key).await;
            return Ok(());
        }
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> MemoryCacheProvider {
        MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 })
    }

    #[tokio::test]
    async fn test_set_get() {
        let provider = make_provider();
        provider
            .set("user:1", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(provider.get("user:1").await.unwrap(), Some("{}".to_string()));
        assert!(provider.exists("user:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let provider = make_provider();
        provider
            .set("role:1", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        provider.delete("role:1").await.unwrap();
        assert_eq!(provider.get("role:1").await.unwrap(), None);
        provider.delete("role:1").await.unwrap();
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_own_ttl() {
        let provider = make_provider();
        provider
            .set("block:short", "short", Duration::from_millis(50))
            .await
            .unwrap();
        provider
            .set("block:long", "long", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!provider.exists("block:short").await.unwrap());
        assert!(provider.exists("block:long").await.unwrap());
    }

    #[tokio::test]
    async fn test_unbounded_keeps_entries_past_any_capacity() {
        let provider = MemoryCacheProvider::unbounded();
        for i in 0..2_000 {
            provider
                .set(&format!("block:{i}"), "x", Duration::from_secs(60))
                .await
                .unwrap();
        }
        provider.cache.run_pending_tasks().await;

        assert_eq!(provider.cache.entry_count(), 2_000);
        assert!(provider.exists("block:0").await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_ttl_writes_nothing() {
        let provider = make_provider();
        provider.set("block:x", "x", Duration::ZERO).await.unwrap();
        assert!(!provider.exists("block:x").await.unwrap());
    }
}
