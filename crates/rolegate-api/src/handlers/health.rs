//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use rolegate_core::traits::cache::CacheProvider;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.store_health.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            warn!(error = %e, "Health check: credential store unreachable");
            "unreachable"
        }
    };

    let cache = match state.cache.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "unreachable",
        Err(e) => {
            warn!(error = %e, "Health check: cache unreachable");
            "unreachable"
        }
    };

    let healthy = database == "connected" && cache == "connected";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            cache: cache.to_string(),
        }),
    )
}
