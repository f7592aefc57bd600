//! Authorization (session) repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::authorization::Authorization;

use super::map_db_error;
use crate::store::AuthorizationStore;

/// PostgreSQL-backed [`AuthorizationStore`].
///
/// `authorizations.user_id` carries a unique index, so the upsert is a
/// single `INSERT ... ON CONFLICT` statement and two concurrent logins
/// for the same user cannot leave two rows.
#[derive(Debug, Clone)]
pub struct AuthorizationRepository {
    pool: PgPool,
}

impl AuthorizationRepository {
    /// Create a new authorization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationStore for AuthorizationRepository {
    async fn upsert(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AppResult<Authorization> {
        sqlx::query_as::<_, Authorization>(
            "INSERT INTO authorizations (id, user_id, access_token, refresh_token, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $2, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                access_token = EXCLUDED.access_token, \
                refresh_token = EXCLUDED.refresh_token, \
                updated_at = NOW(), \
                updated_by = EXCLUDED.updated_by \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to upsert session"))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Authorization>> {
        sqlx::query_as::<_, Authorization>("SELECT * FROM authorizations WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find session"))
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<Option<Authorization>> {
        sqlx::query_as::<_, Authorization>(
            "SELECT * FROM authorizations WHERE refresh_token = $1",
        )
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find session by refresh token"))
    }

    async fn update_access_token(&self, user_id: Uuid, access_token: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE authorizations SET access_token = $2, updated_at = NOW(), updated_by = $1 \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(access_token)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("Failed to update access token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_tokens(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE authorizations SET access_token = NULL, refresh_token = NULL, \
                updated_at = NOW(), updated_by = $1 \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("Failed to clear session tokens"))?;

        Ok(())
    }
}
