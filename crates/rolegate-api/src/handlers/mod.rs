//! Route handlers organized by domain.

pub mod auth;
pub mod feature;
pub mod health;
pub mod role;
pub mod role_feature;
pub mod user;

/// Menu slugs gating the admin routes.
pub mod menu {
    pub const USERS: &str = "users";
    pub const ROLES: &str = "roles";
    pub const FEATURES: &str = "features";
}
