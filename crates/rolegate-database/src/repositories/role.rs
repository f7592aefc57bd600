//! Role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::feature::Feature;
use rolegate_entity::role::{Role, RoleSummary, UpdateRole};

use super::map_db_error;
use crate::store::{RoleStore, RoleWithFeatures};

/// PostgreSQL-backed [`RoleStore`].
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find role"))
    }

    async fn find_with_features(&self, id: Uuid) -> AppResult<Option<RoleWithFeatures>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(map_db_error("Failed to acquire connection"))?;

        let Some(role) =
            sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(map_db_error("Failed to find role"))?
        else {
            return Ok(None);
        };

        let features = sqlx::query_as::<_, Feature>(
            "SELECT f.* FROM features f \
             JOIN role_features rf ON rf.feature_id = f.id \
             WHERE rf.role_id = $1 AND f.deleted_at IS NULL \
             ORDER BY f.menu_seq_no, f.name",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error("Failed to load role features"))?;

        Ok(Some(RoleWithFeatures { role, features }))
    }

    async fn list_summaries(&self) -> AppResult<Vec<RoleSummary>> {
        sqlx::query_as::<_, RoleSummary>(
            "SELECT r.id AS role_id, r.name AS role_name, r.level AS role_level, \
                    COUNT(u.id) AS number_user \
             FROM roles r \
             LEFT JOIN users u ON u.role_id = r.id AND u.deleted_at IS NULL \
             WHERE r.deleted_at IS NULL \
             GROUP BY r.id, r.name, r.level \
             ORDER BY r.level DESC, r.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list roles"))
    }

    async fn update(&self, id: Uuid, data: &UpdateRole, actor: Uuid) -> AppResult<Option<Role>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("Failed to begin transaction"))?;

        let Some(role) = sqlx::query_as::<_, Role>(
            "UPDATE roles SET \
                name = COALESCE($2, name), \
                level = COALESCE($3, level), \
                updated_at = NOW(), \
                updated_by = $4 \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.level)
        .bind(actor)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error("Failed to update role"))?
        else {
            return Ok(None);
        };

        for change in &data.grants {
            sqlx::query(
                "INSERT INTO role_features \
                    (id, role_id, feature_id, is_add, is_view, is_edit, is_delete, created_by, updated_by) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
                 ON CONFLICT (role_id, feature_id) DO UPDATE SET \
                    is_add = EXCLUDED.is_add, \
                    is_view = EXCLUDED.is_view, \
                    is_edit = EXCLUDED.is_edit, \
                    is_delete = EXCLUDED.is_delete, \
                    updated_at = NOW(), \
                    updated_by = EXCLUDED.updated_by",
            )
            .bind(Uuid::now_v7())
            .bind(id)
            .bind(change.feature_id)
            .bind(change.flags.is_add)
            .bind(change.flags.is_view)
            .bind(change.flags.is_edit)
            .bind(change.flags.is_delete)
            .bind(actor)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error("Failed to write role grant"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_error("Failed to commit role update"))?;

        Ok(Some(role))
    }
}
