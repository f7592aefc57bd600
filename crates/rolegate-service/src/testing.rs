//! Shared wiring for service tests.

use std::sync::Arc;
use std::time::Duration;

use rolegate_auth::PermissionResolver;
use rolegate_cache::memory::MemoryCacheProvider;
use rolegate_cache::{CacheAside, CacheManager};
use rolegate_core::config::cache::MemoryCacheConfig;
use rolegate_database::memory::MemoryStore;

pub(crate) const DEADLINE: Duration = Duration::from_secs(1);

pub(crate) struct Deps {
    pub store: Arc<MemoryStore>,
    pub cache: CacheAside,
    pub resolver: Arc<PermissionResolver>,
}

pub(crate) fn deps() -> Deps {
    let store = Arc::new(MemoryStore::new());
    let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 });
    let manager = Arc::new(CacheManager::from_provider(Arc::new(provider)));
    let cache = CacheAside::new(manager, Duration::from_secs(600), DEADLINE);
    let resolver = Arc::new(PermissionResolver::new(
        store.clone(),
        store.clone(),
        store.clone(),
        cache.clone(),
        DEADLINE,
    ));

    Deps {
        store,
        cache,
        resolver,
    }
}
