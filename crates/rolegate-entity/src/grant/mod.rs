//! RoleFeature grant: the allowed actions of one role on one feature.

pub mod model;

pub use model::{PermissionFlags, RoleFeature};
