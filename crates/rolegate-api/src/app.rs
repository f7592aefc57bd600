//! Application builder: wires router, middleware and state into an Axum app,
//! and serves it until a shutdown signal arrives.

use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing::{info, warn};

use rolegate_core::config::CorsConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_compression_layer())
        .layer(build_cors_layer(cors_config))
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState) -> AppResult<()> {
    let server = state.server.clone();
    let app = build_app(state, &server.cors);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::configuration(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Rolegate server listening");

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let mut running = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        joined = &mut running => return finish(joined),
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(true);
    let grace = Duration::from_secs(server.shutdown_grace_seconds);
    match tokio::time::timeout(grace, running).await {
        Ok(joined) => finish(joined)?,
        Err(_) => warn!(
            grace_secs = server.shutdown_grace_seconds,
            "Open connections outlived the shutdown grace period"
        ),
    }

    info!("Server stopped");
    Ok(())
}

fn finish(joined: Result<std::io::Result<()>, JoinError>) -> AppResult<()> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {e}"))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {e}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
