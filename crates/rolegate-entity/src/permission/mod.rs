//! Resolved permissions and the user profile that carries them.

pub mod action;
pub mod model;

pub use action::Action;
pub use model::{FeaturePermission, RolePermissions, UserProfile};
