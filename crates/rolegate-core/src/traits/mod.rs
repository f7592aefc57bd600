//! Core traits defined in `rolegate-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
