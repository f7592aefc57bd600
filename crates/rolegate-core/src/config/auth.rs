//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM-encoded RSA private key used to sign tokens.
    pub private_key_path: String,
    /// Path to the PEM-encoded RSA public key used to verify tokens.
    pub public_key_path: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Upper bound for a single credential store or cache call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
    /// Shortest password accepted on a password change, in characters.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
    /// Longest password accepted on a password change, in characters.
    #[serde(default = "default_password_max_length")]
    pub password_max_length: usize,
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    72
}

fn default_store_timeout() -> u64 {
    3000
}

fn default_password_min_length() -> usize {
    8
}

fn default_password_max_length() -> usize {
    16
}
