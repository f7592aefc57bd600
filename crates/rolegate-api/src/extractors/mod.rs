//! Custom Axum extractors.

pub mod auth;
pub mod bearer;
pub mod json;
pub mod path;

pub use auth::AuthUser;
pub use bearer::BearerToken;
pub use json::ValidatedJson;
