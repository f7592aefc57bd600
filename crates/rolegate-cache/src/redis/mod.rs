//! Redis cache backend: connection handling and provider operations.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisCacheProvider;
