//! RS256 token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rolegate_core::config::AuthConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;

use super::claims::{Claims, TokenType};

/// Signs access and refresh tokens with the RSA private key.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

/// A freshly signed token and when it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

impl JwtEncoder {
    /// Load the private key named in `config`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let pem = std::fs::read(&config.private_key_path).map_err(|e| {
            AppError::configuration(format!(
                "Cannot read private key '{}': {e}",
                config.private_key_path
            ))
        })?;

        Self::from_pem(
            &pem,
            Duration::minutes(config.access_ttl_minutes as i64),
            Duration::hours(config.refresh_ttl_hours as i64),
        )
    }

    /// Build an encoder from a PEM-encoded RSA private key.
    pub fn from_pem(pem: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(pem)
            .map_err(|e| AppError::configuration(format!("Invalid RSA private key: {e}")))?;

        Ok(Self {
            encoding_key,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issue a fresh access + refresh pair.
    pub fn issue(&self, user_id: Uuid, email: &str) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue_access(user_id, email)?,
            refresh: self.mint(user_id, None, TokenType::Refresh, self.refresh_ttl)?,
        })
    }

    /// Issue a standalone access token (the refresh flow).
    pub fn issue_access(&self, user_id: Uuid, email: &str) -> AppResult<IssuedToken> {
        self.mint(
            user_id,
            Some(email.to_string()),
            TokenType::Access,
            self.access_ttl,
        )
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::RS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    fn mint(
        &self,
        user_id: Uuid,
        email: Option<String>,
        token_type: TokenType,
        ttl: Duration,
    ) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            user_id,
            email,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_PEM: &[u8] = include_bytes!("testdata/private.pem");

    #[test]
    fn test_pair_lifetimes() {
        let encoder =
            JwtEncoder::from_pem(PRIVATE_PEM, Duration::minutes(15), Duration::hours(72)).unwrap();
        let before = Utc::now();
        let pair = encoder.issue(Uuid::new_v4(), "a@b.com").unwrap();

        let access_left = pair.access.expires_at - before;
        let refresh_left = pair.refresh.expires_at - before;
        assert!((access_left - Duration::minutes(15)).num_seconds().abs() <= 2);
        assert!((refresh_left - Duration::hours(72)).num_seconds().abs() <= 2);
        assert_ne!(pair.access.token, pair.refresh.token);
    }

    #[test]
    fn test_same_second_tokens_differ() {
        let encoder =
            JwtEncoder::from_pem(PRIVATE_PEM, Duration::minutes(15), Duration::hours(72)).unwrap();
        let id = Uuid::new_v4();
        let first = encoder.issue_access(id, "a@b.com").unwrap();
        let second = encoder.issue_access(id, "a@b.com").unwrap();
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_rejects_non_rsa_key() {
        let err = JwtEncoder::from_pem(b"not a key", Duration::minutes(1), Duration::hours(1))
            .unwrap_err();
        assert_eq!(err.kind, rolegate_core::ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_key_file_is_configuration_error() {
        let config = AuthConfig {
            private_key_path: "/nonexistent/private.pem".into(),
            public_key_path: "/nonexistent/public.pem".into(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 72,
            leeway_seconds: 0,
            store_timeout_ms: 3000,
            password_min_length: 8,
            password_max_length: 16,
        };
        let err = JwtEncoder::new(&config).unwrap_err();
        assert_eq!(err.kind, rolegate_core::ErrorKind::Configuration);
    }
}
