//! # rolegate-entity
//!
//! Domain entity models for Rolegate. Every struct in this crate
//! represents a database table row or a response value object. Table
//! rows derive `sqlx::FromRow`; everything is `Serialize`/`Deserialize`
//! so it can round-trip through the cache.

pub mod authorization;
pub mod feature;
pub mod grant;
pub mod permission;
pub mod role;
pub mod user;
