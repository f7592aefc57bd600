//! Authorization record: the latest token pair issued to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per user holding the most recently issued tokens.
///
/// Logout blanks both token columns to `NULL`, so a cleared row can
/// never satisfy a refresh-token lookup.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Authorization {
    /// Row identifier.
    pub id: Uuid,
    /// Owning user, unique across the table.
    pub user_id: Uuid,
    /// Latest access token.
    pub access_token: Option<String>,
    /// Latest refresh token.
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authorization {
    /// Whether the row still holds tokens.
    pub fn is_cleared(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}
