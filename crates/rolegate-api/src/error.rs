//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use rolegate_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An `AppError` on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredentials
        | ErrorKind::TokenMalformed
        | ErrorKind::TokenInvalidSignature
        | ErrorKind::TokenExpired
        | ErrorKind::TokenRevoked
        | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::AccountDeactivated | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::UpstreamStoreFailure => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::PermissionResolutionInconsistency
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        // Server-side failures keep their details in the log only.
        let message = match err.kind {
            ErrorKind::UpstreamStoreFailure => {
                tracing::error!(error = %err, source = ?err.source, "Upstream store failure");
                "Service temporarily unavailable".to_string()
            }
            kind if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(kind = %kind, error = %err, source = ?err.source, "Internal server error");
                "Internal server error".to_string()
            }
            _ => err.message,
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ApiErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_token_kinds_are_unauthorized() {
        for kind in [
            ErrorKind::TokenMalformed,
            ErrorKind::TokenInvalidSignature,
            ErrorKind::TokenExpired,
            ErrorKind::TokenRevoked,
        ] {
            assert_eq!(status_for(kind), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            status_for(ErrorKind::AccountDeactivated),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_revoked_token_keeps_its_code() {
        let response = ApiError(AppError::token_revoked("Token has been revoked")).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_of(response).await;
        assert_eq!(body.error, "TOKEN_REVOKED");
        assert_eq!(body.message, "Token has been revoked");
    }

    #[tokio::test]
    async fn test_store_details_are_hidden() {
        let response =
            ApiError(AppError::upstream("connection refused to db:5432")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_of(response).await;
        assert_eq!(body.error, "UPSTREAM_STORE_FAILURE");
        assert!(!body.message.contains("5432"));
    }

    #[tokio::test]
    async fn test_inconsistency_is_generic_server_error() {
        let response =
            ApiError(AppError::permission_inconsistency("Role 1 has feature 2")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.error, "PERMISSION_RESOLUTION_INCONSISTENCY");
        assert_eq!(body.message, "Internal server error");
    }
}
