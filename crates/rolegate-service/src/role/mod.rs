//! Role reads and updates.

pub mod service;

pub use service::RoleService;
