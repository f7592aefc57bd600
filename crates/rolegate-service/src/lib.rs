//! # rolegate-service
//!
//! Cached entity services for Rolegate. Reads go through the cache-aside
//! layer; every write invalidates the entity key and each list key that
//! may embed the entity, then repopulates them.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod feature;
pub mod grant;
mod refill;
pub mod role;
pub mod user;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use feature::FeatureService;
pub use grant::RoleFeatureService;
pub use role::RoleService;
pub use user::UserService;
