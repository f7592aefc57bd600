//! Post-write cache repopulation.

use std::future::Future;

use tracing::warn;

use rolegate_core::result::AppResult;

/// Reload an entry right after it was invalidated. The write it follows
/// has already committed, so a failure here is logged and the next read
/// loads the entry instead.
pub(crate) async fn refill<T, Fut>(key: &str, load: Fut)
where
    Fut: Future<Output = AppResult<T>>,
{
    if let Err(e) = load.await {
        warn!(key, error = %e, "Cache repopulation failed after write");
    }
}
