//! Role to per-feature permission resolution.

pub mod resolver;

pub use resolver::{Authorized, PermissionResolver};
