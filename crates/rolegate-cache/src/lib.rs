//! # rolegate-cache
//!
//! Cache provider implementations for Rolegate. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with a per-entry TTL
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. On top of
//! either backend, [`CacheAside`] implements read-through and
//! write-invalidate for entity lookups.

pub mod aside;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use aside::CacheAside;
pub use provider::CacheManager;
