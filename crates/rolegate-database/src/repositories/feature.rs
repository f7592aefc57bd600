//! Feature repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use rolegate_core::result::AppResult;
use rolegate_entity::feature::Feature;

use super::map_db_error;
use crate::store::FeatureStore;

/// PostgreSQL-backed [`FeatureStore`].
#[derive(Debug, Clone)]
pub struct FeatureRepository {
    pool: PgPool,
}

impl FeatureRepository {
    /// Create a new feature repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureStore for FeatureRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Feature>> {
        sqlx::query_as::<_, Feature>(
            "SELECT * FROM features WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find feature"))
    }

    async fn list(&self) -> AppResult<Vec<Feature>> {
        sqlx::query_as::<_, Feature>(
            "SELECT * FROM features WHERE deleted_at IS NULL ORDER BY menu_seq_no, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list features"))
    }
}
