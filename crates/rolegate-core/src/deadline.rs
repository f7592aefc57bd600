//! Deadline helpers for calls into the credential store and cache.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::result::AppResult;

/// Run a store or cache call, failing with `UpstreamStoreFailure` if it
/// does not finish within `limit`.
pub async fn bounded<T, F>(limit: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::upstream(format!(
            "{operation} did not complete within {}ms",
            limit.as_millis()
        ))),
    }
}
