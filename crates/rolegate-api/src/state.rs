//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use rolegate_auth::{
    JwtDecoder, JwtEncoder, PasswordHasher, PasswordPolicy, PermissionResolver, RevocationStore,
    SessionManager, SessionStore,
};
use rolegate_cache::{CacheAside, CacheManager};
use rolegate_core::config::{AppConfig, ServerConfig};
use rolegate_database::repositories::{
    AuthorizationRepository, FeatureRepository, GrantRepository, RoleRepository, UserRepository,
};
use rolegate_database::{
    AuthorizationStore, DatabasePool, FeatureStore, GrantStore, RoleStore, StoreHealth, UserStore,
};
use rolegate_service::{FeatureService, RoleFeatureService, RoleService, UserService};

/// The credential store, one handle per contract.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub features: Arc<dyn FeatureStore>,
    pub grants: Arc<dyn GrantStore>,
    pub authorizations: Arc<dyn AuthorizationStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    /// PostgreSQL repositories over one pool.
    pub fn postgres(db: &DatabasePool) -> Self {
        let pool = db.pool();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            roles: Arc::new(RoleRepository::new(pool.clone())),
            features: Arc::new(FeatureRepository::new(pool.clone())),
            grants: Arc::new(GrantRepository::new(pool.clone())),
            authorizations: Arc::new(AuthorizationRepository::new(pool)),
            health: Arc::new(db.clone()),
        }
    }

    /// Every contract served by the same backend, e.g. the in-memory store.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserStore + RoleStore + FeatureStore + GrantStore + AuthorizationStore + StoreHealth,
    {
        Self {
            users: store.clone(),
            roles: store.clone(),
            features: store.clone(),
            grants: store.clone(),
            authorizations: store.clone(),
            health: store,
        }
    }
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub server: Arc<ServerConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,
    /// Liveness probe for the credential store
    pub store_health: Arc<dyn StoreHealth>,

    // ── Auth ─────────────────────────────────────────────────
    /// Login, logout, refresh and bearer authentication
    pub sessions: Arc<SessionManager>,
    /// Per-feature permission checks
    pub permissions: Arc<PermissionResolver>,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub role_service: Arc<RoleService>,
    pub feature_service: Arc<FeatureService>,
    pub role_feature_service: Arc<RoleFeatureService>,
}

impl AppState {
    /// Wire the auth stack and the cached services over `stores`.
    pub fn assemble(
        stores: Stores,
        cache: Arc<CacheManager>,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        config: &AppConfig,
    ) -> Self {
        let deadline = Duration::from_millis(config.auth.store_timeout_ms);
        let entity_ttl = Duration::from_secs(config.cache.entity_ttl_seconds);
        let aside = CacheAside::new(Arc::clone(&cache), entity_ttl, deadline);

        let permissions = Arc::new(PermissionResolver::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.roles),
            Arc::clone(&stores.grants),
            aside.clone(),
            deadline,
        ));

        let sessions = Arc::new(SessionManager::new(
            Arc::new(encoder),
            Arc::new(decoder),
            SessionStore::new(Arc::clone(&stores.authorizations), deadline),
            RevocationStore::new(Arc::clone(&cache), deadline),
            Arc::clone(&stores.users),
            Arc::clone(&permissions),
            PasswordHasher::new(),
            deadline,
        ));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&permissions),
            aside.clone(),
            PasswordHasher::new(),
            PasswordPolicy::new(&config.auth),
            deadline,
        ));
        let role_service = Arc::new(RoleService::new(
            Arc::clone(&stores.roles),
            Arc::clone(&permissions),
            aside.clone(),
            deadline,
        ));
        let feature_service = Arc::new(FeatureService::new(
            Arc::clone(&stores.features),
            aside.clone(),
            deadline,
        ));
        let role_feature_service = Arc::new(RoleFeatureService::new(
            Arc::clone(&stores.grants),
            Arc::clone(&permissions),
            aside,
            deadline,
        ));

        Self {
            server: Arc::new(config.server.clone()),
            cache,
            store_health: stores.health,
            sessions,
            permissions,
            user_service,
            role_service,
            feature_service,
            role_feature_service,
        }
    }
}
