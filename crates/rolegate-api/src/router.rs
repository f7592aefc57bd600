//! Route definitions for the Rolegate HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor. Authentication happens in the `AuthUser` extractor,
//! so public and protected routes share one router.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.server.max_body_bytes;
    let timeout = Duration::from_secs(state.server.request_timeout_seconds);

    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(feature_routes())
        .merge(role_feature_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, refresh, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route(
            "/users/{id}",
            get(handlers::user::get_user).put(handlers::user::update_user),
        )
        .route("/users/{id}/password", put(handlers::user::change_password))
}

fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(handlers::role::list_roles))
        .route(
            "/roles/{id}",
            get(handlers::role::get_role).put(handlers::role::update_role),
        )
}

fn feature_routes() -> Router<AppState> {
    Router::new()
        .route("/features", get(handlers::feature::list_features))
        .route("/features/{id}", get(handlers::feature::get_feature))
}

fn role_feature_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/role-features",
            get(handlers::role_feature::list_role_features),
        )
        .route(
            "/role-features/{id}",
            put(handlers::role_feature::update_role_feature),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
