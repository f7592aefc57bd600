//! JWT claims carried by access and refresh tokens.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload shared by both token types.
///
/// Access tokens carry `email`; refresh tokens omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// The user the token was issued to.
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID. Two tokens minted in the same second still differ.
    pub jti: Uuid,
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token for API requests.
    Access,
    /// Long-lived token accepted only by the refresh flow.
    Refresh,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Time left until `exp`, floored at zero.
    pub fn remaining_ttl(&self) -> Duration {
        self.remaining_ttl_at(Utc::now().timestamp())
    }

    /// Time left until `exp` as seen at `now` (seconds since epoch).
    pub fn remaining_ttl_at(&self, now: i64) -> Duration {
        let remaining = self.exp.saturating_sub(now);
        Duration::from_secs(u64::try_from(remaining).unwrap_or(0))
    }
}
