//! Request context carrying the acting user and their privilege level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rolegate_auth::permission::Authorized;

/// Context for the current authenticated request.
///
/// Built after the permission check and passed into service methods so
/// that every write knows *who* is acting and how privileged they are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Level of the user's role; the minimum level when they hold none.
    pub role_level: i32,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: Uuid, role_level: i32) -> Self {
        Self {
            user_id,
            role_level,
            request_time: Utc::now(),
        }
    }

    /// Whether the actor may manage something at `level`.
    pub fn outranks_or_equals(&self, level: i32) -> bool {
        self.role_level >= level
    }
}

impl From<&Authorized> for RequestContext {
    fn from(authorized: &Authorized) -> Self {
        Self::new(authorized.user.id, authorized.role_level())
    }
}
