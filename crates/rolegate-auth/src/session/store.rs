//! The per-user session row holding the latest token pair.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use rolegate_core::deadline::bounded;
use rolegate_core::result::AppResult;
use rolegate_database::AuthorizationStore;
use rolegate_entity::authorization::Authorization;

/// Deadline-bounded access to the authorization rows.
#[derive(Debug, Clone)]
pub struct SessionStore {
    repo: Arc<dyn AuthorizationStore>,
    deadline: Duration,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn AuthorizationStore>, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    /// Replace the user's tokens in place, or create the row.
    pub async fn upsert_session(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<Authorization> {
        bounded(
            self.deadline,
            "session upsert",
            self.repo.upsert(user_id, access_token, refresh_token),
        )
        .await
    }

    /// Find the session currently holding `refresh_token`.
    pub async fn get_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<Option<Authorization>> {
        bounded(
            self.deadline,
            "session lookup",
            self.repo.find_by_refresh_token(refresh_token),
        )
        .await
    }

    /// Store a renewed access token. Returns `false` if the row is gone.
    pub async fn update_access_token(&self, user_id: Uuid, access_token: &str) -> AppResult<bool> {
        bounded(
            self.deadline,
            "session update",
            self.repo.update_access_token(user_id, access_token),
        )
        .await
    }

    /// Blank both stored tokens for the user.
    pub async fn clear_session_tokens(&self, user_id: Uuid) -> AppResult<()> {
        bounded(
            self.deadline,
            "session clear",
            self.repo.clear_tokens(user_id),
        )
        .await
    }
}
