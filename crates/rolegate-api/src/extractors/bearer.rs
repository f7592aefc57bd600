//! `BearerToken` extractor: the raw token from the Authorization header.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use rolegate_core::error::AppError;

use crate::error::ApiError;

/// The raw token string, with any `Bearer ` scheme prefix removed.
///
/// Performs no validation; logout hands the string to the session
/// manager as-is.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl BearerToken {
    /// Pull the token out of an Authorization header value.
    pub fn parse(header: &str) -> Option<&str> {
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        (!token.is_empty()).then_some(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = Self::parse(header)
            .ok_or_else(|| AppError::unauthorized("Empty bearer token"))?;

        Ok(Self(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_scheme() {
        assert_eq!(BearerToken::parse("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(BearerToken::parse("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(BearerToken::parse("Bearer "), None);
        assert_eq!(BearerToken::parse(""), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = BearerToken("secret.token.value".into());
        assert!(!format!("{token:?}").contains("secret"));
    }
}
