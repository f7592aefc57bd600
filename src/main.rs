//! Rolegate Server: authentication and role-based access control.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use rolegate_api::{AppState, Stores};
use rolegate_auth::{JwtDecoder, JwtEncoder};
use rolegate_cache::CacheManager;
use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("ROLEGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(%env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. `RUST_LOG` overrides `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Rolegate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Signing keys ─────────────────────────────────────
    // Loaded first so a missing key stops startup before any connection is made.
    let encoder = JwtEncoder::new(&config.auth)?;
    let decoder = JwtDecoder::new(&config.auth)?;
    tracing::info!("Token signing keys loaded");

    // ── Step 2: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;

    // ── Step 3: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 4: Wire services and serve ──────────────────────────
    let state = AppState::assemble(Stores::postgres(&db), cache, encoder, decoder, &config);
    let result = rolegate_api::app::serve(state).await;

    db.close().await;
    result
}
