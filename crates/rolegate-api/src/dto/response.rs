//! Response DTOs.

use serde::{Deserialize, Serialize};

use rolegate_auth::LoginOutcome;
use rolegate_entity::permission::UserProfile;

/// Body of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            message: "Login successful".to_string(),
            access_token: outcome.tokens.access.token,
            refresh_token: outcome.tokens.refresh.token,
            user: outcome.profile,
        }
    }
}

/// Body of a successful refresh. The refresh token itself is not rotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, else `"degraded"`.
    pub status: String,
    pub version: String,
    /// Database status.
    pub database: String,
    /// Cache status.
    pub cache: String,
}
