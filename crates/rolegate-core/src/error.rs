//! Unified application error types for Rolegate.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The token and credential kinds
//! are distinct so that the HTTP layer can tell a revoked token apart
//! from an expired or forged one.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Unknown identifier or password mismatch.
    InvalidCredentials,
    /// The identifier resolves but the account is flagged inactive.
    AccountDeactivated,
    /// The token could not be parsed or is missing required claims.
    TokenMalformed,
    /// The token signature or algorithm does not verify against the public key.
    TokenInvalidSignature,
    /// The token's `exp` claim is in the past.
    TokenExpired,
    /// The token is valid but present in the revocation store.
    TokenRevoked,
    /// A role references a feature with no matching grant row.
    PermissionResolutionInconsistency,
    /// The credential store or cache could not be reached.
    UpstreamStoreFailure,
    /// No credentials were presented.
    Unauthorized,
    /// The caller is authenticated but not allowed to perform the action.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A uniqueness constraint was violated.
    Conflict,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind is one of the token validation failures.
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            Self::TokenMalformed
                | Self::TokenInvalidSignature
                | Self::TokenExpired
                | Self::TokenRevoked
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountDeactivated => write!(f, "ACCOUNT_DEACTIVATED"),
            Self::TokenMalformed => write!(f, "TOKEN_MALFORMED"),
            Self::TokenInvalidSignature => write!(f, "TOKEN_INVALID_SIGNATURE"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::TokenRevoked => write!(f, "TOKEN_REVOKED"),
            Self::PermissionResolutionInconsistency => {
                write!(f, "PERMISSION_RESOLUTION_INCONSISTENCY")
            }
            Self::UpstreamStoreFailure => write!(f, "UPSTREAM_STORE_FAILURE"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Rolegate.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Unknown identifier or wrong password. The message is fixed so both
    /// cases look the same to the caller.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::InvalidCredentials,
            "Invalid identifier or password",
        )
    }

    /// Create an account-deactivated error.
    pub fn account_deactivated() -> Self {
        Self::new(
            ErrorKind::AccountDeactivated,
            "Your account was deactivated",
        )
    }

    /// Create a malformed-token error.
    pub fn token_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenMalformed, message)
    }

    /// Create an invalid-signature error.
    pub fn token_invalid_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalidSignature, message)
    }

    /// Create an expired-token error.
    pub fn token_expired() -> Self {
        Self::new(ErrorKind::TokenExpired, "Token has expired")
    }

    /// Create a revoked-token error.
    pub fn token_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenRevoked, message)
    }

    /// Create a permission-resolution inconsistency error.
    pub fn permission_inconsistency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionResolutionInconsistency, message)
    }

    /// Create an upstream store failure.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamStoreFailure, message)
    }

    /// Create an unauthorized error (no credentials presented).
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
