//! RS256 token validation.
//!
//! Validation is purely cryptographic: signature, algorithm and expiry.
//! Revocation is checked separately by the session layer.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use rolegate_core::config::AuthConfig;
use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;

use super::claims::{Claims, TokenType};

/// Verifies tokens against the RSA public key.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Load the public key named in `config`.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let pem = std::fs::read(&config.public_key_path).map_err(|e| {
            AppError::configuration(format!(
                "Cannot read public key '{}': {e}",
                config.public_key_path
            ))
        })?;

        Self::from_pem(&pem, config.leeway_seconds)
    }

    /// Build a decoder from a PEM-encoded RSA public key.
    pub fn from_pem(pem: &[u8], leeway_seconds: u64) -> AppResult<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(pem)
            .map_err(|e| AppError::configuration(format!("Invalid RSA public key: {e}")))?;

        // Only RS256 is listed, so any other header algorithm is refused
        // before the signature is looked at.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify signature, algorithm and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::token_expired(),
                JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidAlgorithm
                | JwtErrorKind::InvalidAlgorithmName
                | JwtErrorKind::InvalidKeyFormat => {
                    AppError::token_invalid_signature("Token signature could not be verified")
                }
                _ => {
                    debug!(error = %e, "Token could not be decoded");
                    AppError::with_source(ErrorKind::TokenMalformed, "Token is malformed", e)
                }
            })
    }

    /// [`validate`](Self::validate), then require an access token.
    pub fn validate_access(&self, token: &str) -> AppResult<Claims> {
        self.validate_typed(token, TokenType::Access)
    }

    /// [`validate`](Self::validate), then require a refresh token.
    pub fn validate_refresh(&self, token: &str) -> AppResult<Claims> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> AppResult<Claims> {
        let claims = self.validate(token)?;
        if claims.token_type != expected {
            return Err(AppError::token_malformed(format!(
                "Expected {expected:?} token, got {:?}",
                claims.token_type
            )));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use rolegate_core::ErrorKind;
    use uuid::Uuid;

    use super::*;
    use crate::jwt::JwtEncoder;

    const PRIVATE_PEM: &[u8] = include_bytes!("testdata/private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("testdata/public.pem");
    const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("testdata/other_public.pem");

    fn encoder() -> JwtEncoder {
        JwtEncoder::from_pem(PRIVATE_PEM, Duration::minutes(15), Duration::hours(72)).unwrap()
    }

    fn decoder() -> JwtDecoder {
        JwtDecoder::from_pem(PUBLIC_PEM, 0).unwrap()
    }

    #[test]
    fn test_issued_pair_validates() {
        let user_id = Uuid::new_v4();
        let pair = encoder().issue(user_id, "a@b.com").unwrap();

        let access = decoder().validate_access(&pair.access.token).unwrap();
        assert_eq!(access.user_id, user_id);
        assert_eq!(access.email.as_deref(), Some("a@b.com"));

        let refresh = decoder().validate_refresh(&pair.refresh.token).unwrap();
        assert_eq!(refresh.user_id, user_id);
        assert!(refresh.email.is_none());
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            email: Some("a@b.com".into()),
            iat: now - 1_000,
            exp: now - 120,
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };
        let token = encoder().sign(&claims).unwrap();

        let err = decoder().validate(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenExpired);
    }

    #[test]
    fn test_wrong_key_is_invalid_signature() {
        let pair = encoder().issue(Uuid::new_v4(), "a@b.com").unwrap();
        let other = JwtDecoder::from_pem(OTHER_PUBLIC_PEM, 0).unwrap();

        let err = other.validate(&pair.access.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalidSignature);
    }

    #[test]
    fn test_hmac_forgery_with_public_key_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            email: Some("attacker@evil.com".into()),
            iat: now,
            exp: now + 600,
            jti: Uuid::new_v4(),
            token_type: TokenType::Access,
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(PUBLIC_PEM),
        )
        .unwrap();

        let err = decoder().validate(&forged).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalidSignature);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = decoder().validate("not-a-token").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }

    #[test]
    fn test_malformed_message_hides_decoder_detail() {
        let garbled = decoder().validate("not-a-token").unwrap_err();
        let bad_json = decoder().validate("e30.e30.e30").unwrap_err();

        assert_eq!(garbled.message, "Token is malformed");
        assert_eq!(bad_json.message, garbled.message);
        assert!(garbled.source.is_some());
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let pair = encoder().issue(Uuid::new_v4(), "a@b.com").unwrap();
        let err = decoder().validate_access(&pair.refresh.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenMalformed);
    }
}
