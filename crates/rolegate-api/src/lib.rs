//! # rolegate-api
//!
//! HTTP API layer for Rolegate built on Axum.
//!
//! Provides the login/refresh/logout endpoints, the permission-gated admin
//! routes, middleware (request logging, CORS, compression), extractors,
//! DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::{AppState, Stores};
