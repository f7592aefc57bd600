//! Login, logout, refresh and per-request authentication.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::UserStore;
use rolegate_entity::permission::UserProfile;
use rolegate_entity::user::User;

use crate::jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, TokenPair};
use crate::password::PasswordHasher;
use crate::permission::PermissionResolver;

use super::revocation::RevocationStore;
use super::store::SessionStore;

/// How far a login attempt got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Unauthenticated,
    CredentialChecked,
    TokenIssued,
    SessionPersisted,
    Ready,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::CredentialChecked => "credential_checked",
            Self::TokenIssued => "token_issued",
            Self::SessionPersisted => "session_persisted",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub profile: UserProfile,
}

/// Orchestrates the token lifecycle over the stores.
#[derive(Debug, Clone)]
pub struct SessionManager {
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
    sessions: SessionStore,
    revocations: RevocationStore,
    users: Arc<dyn UserStore>,
    resolver: Arc<PermissionResolver>,
    hasher: PasswordHasher,
    deadline: Duration,
}

impl SessionManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        sessions: SessionStore,
        revocations: RevocationStore,
        users: Arc<dyn UserStore>,
        resolver: Arc<PermissionResolver>,
        hasher: PasswordHasher,
        deadline: Duration,
    ) -> Self {
        Self {
            encoder,
            decoder,
            sessions,
            revocations,
            users,
            resolver,
            hasher,
            deadline,
        }
    }

    /// Verify credentials, issue a fresh pair, and persist it.
    ///
    /// `identifier` is an email when it contains `@`, else a phone number.
    /// Unknown identifiers and wrong passwords fail identically.
    pub async fn login(&self, identifier: &str, password: &str) -> AppResult<LoginOutcome> {
        let identifier = identifier.trim();
        let mut stage = LoginStage::Unauthenticated;
        debug!(%stage, "Login attempt");

        let user = self.find_by_identifier(identifier).await?.ok_or_else(|| {
            info!(%stage, "Login rejected: unknown identifier");
            AppError::invalid_credentials()
        })?;

        if !user.can_login() {
            info!(user_id = %user.id, %stage, "Login rejected: account deactivated");
            return Err(AppError::account_deactivated());
        }

        if !self.hasher.verify(password, &user.password)? {
            info!(user_id = %user.id, %stage, "Login rejected: password mismatch");
            return Err(AppError::invalid_credentials());
        }
        stage = LoginStage::CredentialChecked;
        debug!(user_id = %user.id, %stage, "Credentials verified");

        let profile = self.resolver.profile(&user).await?;

        let tokens = self.encoder.issue(user.id, &user.email)?;
        stage = LoginStage::TokenIssued;
        debug!(user_id = %user.id, %stage, "Token pair issued");

        self.sessions
            .upsert_session(user.id, &tokens.access.token, &tokens.refresh.token)
            .await?;
        stage = LoginStage::SessionPersisted;
        debug!(user_id = %user.id, %stage, "Session persisted");

        stage = LoginStage::Ready;
        info!(
            user_id = %user.id,
            %stage,
            permissions = profile.permissions.len(),
            "Login successful"
        );

        Ok(LoginOutcome { tokens, profile })
    }

    /// Revoke `token` and blank the user's stored pair.
    ///
    /// The token is validated before anything is written, so an invalid
    /// token leaves no trace. Logging out twice with the same token
    /// succeeds both times.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.decoder.validate(token)?;
        let ttl = claims.remaining_ttl();

        self.revocations.block(token, ttl).await?;
        self.sessions.clear_session_tokens(claims.user_id).await?;

        info!(user_id = %claims.user_id, ttl_secs = ttl.as_secs(), "Logout successful");
        Ok(())
    }

    /// Issue a new access token for the session holding `refresh_token`.
    ///
    /// The refresh token is not rotated and the previous access token is
    /// left to expire on its own.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<IssuedToken> {
        if refresh_token.trim().is_empty() {
            return Err(AppError::validation("refreshToken must not be empty"));
        }

        let session = self
            .sessions
            .get_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| {
                info!("Refresh rejected: no session holds this refresh token");
                AppError::token_revoked("Refresh token is no longer valid")
            })?;

        let user = self
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::token_revoked("Session owner no longer exists"))?;

        let claims = self.decoder.validate_refresh(refresh_token)?;
        if claims.user_id != user.id {
            warn!(user_id = %user.id, "Refresh token subject does not match its session");
            return Err(AppError::token_revoked("Refresh token is no longer valid"));
        }

        if !user.can_login() {
            info!(user_id = %user.id, "Refresh rejected: account deactivated");
            return Err(AppError::account_deactivated());
        }

        let access = self.encoder.issue_access(user.id, &user.email)?;
        if !self
            .sessions
            .update_access_token(user.id, &access.token)
            .await?
        {
            // The row vanished between lookup and write.
            return Err(AppError::token_revoked("Refresh token is no longer valid"));
        }

        info!(user_id = %user.id, "Access token refreshed");
        Ok(access)
    }

    /// Validate a bearer access token and reject it if it was revoked.
    pub async fn authenticate(&self, token: &str) -> AppResult<Claims> {
        let claims = self.decoder.validate_access(token)?;

        if self.revocations.is_blocked(token).await? {
            debug!(user_id = %claims.user_id, "Rejected revoked token");
            return Err(AppError::token_revoked("Token has been revoked"));
        }

        Ok(claims)
    }

    /// The caller's profile with freshly resolved permissions.
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self
            .resolver
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;
        if !user.can_login() {
            return Err(AppError::account_deactivated());
        }
        self.resolver.profile(&user).await
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        if identifier.is_empty() {
            return Ok(None);
        }

        if User::identifier_is_email(identifier) {
            bounded(
                self.deadline,
                "user lookup",
                self.users.find_by_email(identifier),
            )
            .await
        } else {
            bounded(
                self.deadline,
                "user lookup",
                self.users.find_by_phone(identifier),
            )
            .await
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        bounded(
            self.deadline,
            "user lookup",
            self.users.find_by_id(user_id),
        )
        .await
    }
}
