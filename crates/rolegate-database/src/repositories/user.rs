//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::user::{UpdateUser, User};

use super::map_db_error;
use crate::store::UserStore;

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find user by email"))
    }

    async fn find_by_phone(&self, phone_number: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE phone_number = $1 AND deleted_at IS NULL",
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find user by phone number"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find user"))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE deleted_at IS NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list users"))
    }

    async fn update(&self, id: Uuid, data: &UpdateUser, actor: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                phone_number = COALESCE($4, phone_number), \
                avatar = COALESCE($5, avatar), \
                role_id = COALESCE($6, role_id), \
                is_active = COALESCE($7, is_active), \
                updated_at = NOW(), \
                updated_by = $8 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.phone_number)
        .bind(&data.avatar)
        .bind(data.role_id)
        .bind(data.is_active)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to update user"))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        actor: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password = $2, updated_at = NOW(), updated_by = $3 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(password_hash)
        .bind(actor)
        .execute(&self.pool)
        .await
        .map_err(map_db_error("Failed to update password"))?;

        Ok(result.rows_affected() > 0)
    }
}
