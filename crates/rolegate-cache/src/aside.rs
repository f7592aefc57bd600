//! Read-through / write-invalidate caching over the credential store.
//!
//! Reads try the cache first and fall back to a loader on a miss, then
//! populate the cache. A failure to *populate* is logged and swallowed:
//! the caller already has the value from the store. A failure to *read*
//! or *invalidate* is returned, since serving or keeping stale data is
//! worse than failing the request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rolegate_core::deadline::bounded;
use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;

use crate::provider::CacheManager;

/// Cache-aside helper with a fixed entry TTL.
#[derive(Debug, Clone)]
pub struct CacheAside {
    cache: Arc<CacheManager>,
    /// TTL applied to every populated entry.
    ttl: Duration,
    /// Upper bound on each cache call.
    deadline: Duration,
}

impl CacheAside {
    /// Create a helper writing entries with `ttl`, bounding each cache call by `deadline`.
    pub fn new(cache: Arc<CacheManager>, ttl: Duration, deadline: Duration) -> Self {
        Self {
            cache,
            ttl,
            deadline,
        }
    }

    /// Return the cached value for `key`, or load it, cache it, and return it.
    pub async fn fetch<T, F, Fut>(&self, key: &str, load: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(hit) = self.read::<T>(key).await? {
            return Ok(hit);
        }

        let value = load().await?;
        self.prime(key, &value).await;
        Ok(value)
    }

    /// Like [`fetch`](Self::fetch) for lookups that may find nothing.
    /// A `None` result is not cached.
    pub async fn fetch_optional<T, F, Fut>(&self, key: &str, load: F) -> AppResult<Option<T>>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<T>>>,
    {
        if let Some(hit) = self.read::<T>(key).await? {
            return Ok(Some(hit));
        }

        let value = load().await?;
        if let Some(found) = &value {
            self.prime(key, found).await;
        }
        Ok(value)
    }

    /// Write `value` under `key`. Failures are logged, never returned.
    pub async fn prime<T: Serialize + Sync>(&self, key: &str, value: &T) {
        let result = bounded(
            self.deadline,
            "cache write",
            self.cache.set_json(key, value, self.ttl),
        )
        .await;

        if let Err(e) = result {
            warn!(key, error = %e, "Cache population failed, serving uncached");
        }
    }

    /// Delete every listed key.
    pub async fn invalidate(&self, keys: &[&str]) -> AppResult<()> {
        for key in keys {
            bounded(self.deadline, "cache invalidation", self.cache.delete(key)).await?;
            debug!(key, "Cache entry invalidated");
        }
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let raw = bounded(self.deadline, "cache read", self.cache.get(key)).await?;

        match raw {
            Some(raw) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    Ok(Some(value))
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding undecodable cache entry");
                    Ok(None)
                }
            },
            None => {
                debug!(key, "Cache miss");
                Ok(None)
            }
        }
    }
}
