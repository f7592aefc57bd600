//! Cache key builders for all Rolegate cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

// ── Entity keys ────────────────────────────────────────────

/// Cache key for a user entity by ID.
pub fn user(user_id: Uuid) -> String {
    format!("user:{user_id}")
}

/// Cache key for a role and its resolved permissions by ID.
pub fn role(role_id: Uuid) -> String {
    format!("role:{role_id}")
}

/// Cache key for a feature entity by ID.
pub fn feature(feature_id: Uuid) -> String {
    format!("feature:{feature_id}")
}

// ── Aggregate keys ─────────────────────────────────────────

/// All users.
pub const USERS_LIST: &str = "users_list";

/// All roles with user counts.
pub const ROLES_LIST: &str = "roles_list";

/// All features.
pub const FEATURES_LIST: &str = "features_list";

/// All role/feature grants.
pub const ROLE_FEATURE_LIST: &str = "role_feature_list";

// ── Revocation keys ────────────────────────────────────────

/// Revocation entry for a raw token string.
pub fn blocked_token(token: &str) -> String {
    format!("block:{token}")
}
