//! # rolegate-database
//!
//! The credential store contracts (`store`), their PostgreSQL
//! implementations (`repositories`), and, behind the `memory` feature,
//! an in-process implementation used by tests and local runs.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    AuthorizationStore, FeatureStore, GrantStore, RoleStore, RoleWithFeatures, StoreHealth,
    UserStore,
};
