//! Role-feature grant reads and flag updates.

pub mod service;

pub use service::RoleFeatureService;
