//! `AuthUser` extractor: validates the bearer access token and rejects revoked ones.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rolegate_auth::Claims;
use rolegate_core::result::AppResult;
use rolegate_entity::permission::Action;
use rolegate_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::bearer::BearerToken;
use crate::state::AppState;

/// Claims of an authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Check that the caller's role allows `action` on the feature
    /// `menu_slug`, returning the context service calls need.
    pub async fn require(
        &self,
        state: &AppState,
        menu_slug: &str,
        action: Action,
    ) -> AppResult<RequestContext> {
        let authorized = state
            .permissions
            .require(self.0.user_id, menu_slug, action)
            .await?;
        Ok(RequestContext::from(&authorized))
    }

    /// The caller's context without a menu check. The account must still
    /// exist and be active.
    pub async fn context(&self, state: &AppState) -> AppResult<RequestContext> {
        let authorized = state.permissions.authorize(self.0.user_id).await?;
        Ok(RequestContext::from(&authorized))
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.sessions.authenticate(&token).await?;
        Ok(AuthUser(claims))
    }
}
