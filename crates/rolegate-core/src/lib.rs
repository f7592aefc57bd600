//! # rolegate-core
//!
//! Core crate for Rolegate. Contains configuration schemas, the cache
//! provider trait, deadline helpers, pagination types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Rolegate crates.

pub mod config;
pub mod deadline;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
