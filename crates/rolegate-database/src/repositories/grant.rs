//! RoleFeature grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::grant::{PermissionFlags, RoleFeature};

use super::map_db_error;
use crate::store::GrantStore;

/// PostgreSQL-backed [`GrantStore`].
#[derive(Debug, Clone)]
pub struct GrantRepository {
    pool: PgPool,
}

impl GrantRepository {
    /// Create a new grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GrantStore for GrantRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RoleFeature>> {
        sqlx::query_as::<_, RoleFeature>("SELECT * FROM role_features WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find grant"))
    }

    async fn find_by_role(&self, role_id: Uuid) -> AppResult<Vec<RoleFeature>> {
        sqlx::query_as::<_, RoleFeature>("SELECT * FROM role_features WHERE role_id = $1")
            .bind(role_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("Failed to find grants for role"))
    }

    async fn list(&self) -> AppResult<Vec<RoleFeature>> {
        sqlx::query_as::<_, RoleFeature>(
            "SELECT * FROM role_features ORDER BY role_id, created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list grants"))
    }

    async fn update_flags(
        &self,
        id: Uuid,
        flags: PermissionFlags,
        actor: Uuid,
    ) -> AppResult<Option<RoleFeature>> {
        sqlx::query_as::<_, RoleFeature>(
            "UPDATE role_features SET \
                is_add = $2, is_view = $3, is_edit = $4, is_delete = $5, \
                updated_at = NOW(), updated_by = $6 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(flags.is_add)
        .bind(flags.is_view)
        .bind(flags.is_edit)
        .bind(flags.is_delete)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to update grant"))
    }
}
