//! Cached feature lookups. Features are read-only here.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use rolegate_cache::{CacheAside, keys};
use rolegate_core::deadline::bounded;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::FeatureStore;
use rolegate_entity::feature::Feature;

#[derive(Debug, Clone)]
pub struct FeatureService {
    features: Arc<dyn FeatureStore>,
    cache: CacheAside,
    deadline: Duration,
}

impl FeatureService {
    pub fn new(features: Arc<dyn FeatureStore>, cache: CacheAside, deadline: Duration) -> Self {
        Self {
            features,
            cache,
            deadline,
        }
    }

    pub async fn get_feature(&self, id: Uuid) -> AppResult<Feature> {
        self.cache
            .fetch_optional(&keys::feature(id), || {
                bounded(self.deadline, "feature lookup", self.features.find_by_id(id))
            })
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feature {id} not found")))
    }

    /// All features ordered by menu sequence.
    pub async fn list_features(&self) -> AppResult<Vec<Feature>> {
        self.cache
            .fetch(keys::FEATURES_LIST, || {
                bounded(self.deadline, "feature list", self.features.list())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use rolegate_core::ErrorKind;
    use rolegate_database::memory::fixtures;

    use super::*;
    use crate::testing::{DEADLINE, deps};

    #[tokio::test]
    async fn test_get_and_list() {
        let deps = deps();
        let users = fixtures::feature("users", 2);
        let roles = fixtures::feature("roles", 1);
        deps.store.insert_feature(users.clone());
        deps.store.insert_feature(roles.clone());
        let service = FeatureService::new(deps.store.clone(), deps.cache, DEADLINE);

        assert_eq!(service.get_feature(users.id).await.unwrap().menu_slug, "users");

        let list = service.list_features().await.unwrap();
        let slugs: Vec<_> = list.iter().map(|f| f.menu_slug.as_str()).collect();
        assert_eq!(slugs, ["roles", "users"]);
    }

    #[tokio::test]
    async fn test_missing_feature() {
        let deps = deps();
        let service = FeatureService::new(deps.store.clone(), deps.cache, DEADLINE);
        let err = service.get_feature(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
