//! Time-bounded blocklist of raw token strings.
//!
//! An entry lives exactly as long as the token it blocks would have
//! stayed valid, so the list never outgrows the set of live tokens.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use rolegate_cache::CacheManager;
use rolegate_cache::keys;
use rolegate_core::deadline::bounded;
use rolegate_core::result::AppResult;
use rolegate_core::traits::cache::CacheProvider;

/// Blocklist stored under `block:<token>` in the cache's revocation
/// provider, which expires entries by TTL only.
#[derive(Debug, Clone)]
pub struct RevocationStore {
    cache: Arc<CacheManager>,
    deadline: Duration,
}

impl RevocationStore {
    pub fn new(cache: Arc<CacheManager>, deadline: Duration) -> Self {
        Self { cache, deadline }
    }

    /// Block `token` for `ttl`. A zero TTL writes nothing: the token is
    /// already past its expiry and validation rejects it anyway.
    pub async fn block(&self, token: &str, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            debug!("Token already expired, no revocation entry written");
            return Ok(());
        }

        let key = keys::blocked_token(token);
        bounded(
            self.deadline,
            "revocation write",
            self.cache.revocations().set(&key, token, ttl),
        )
        .await?;

        debug!(ttl_secs = ttl.as_secs(), "Token blocked");
        Ok(())
    }

    /// Whether `token` has a live revocation entry.
    pub async fn is_blocked(&self, token: &str) -> AppResult<bool> {
        let key = keys::blocked_token(token);
        bounded(
            self.deadline,
            "revocation lookup",
            self.cache.revocations().exists(&key),
        )
        .await
    }
}
