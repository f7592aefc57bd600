//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use rolegate_api::{AppState, Stores, build_app};
use rolegate_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use rolegate_cache::CacheManager;
use rolegate_core::config::{
    AppConfig, AuthConfig, CacheConfig, CorsConfig, DatabaseConfig, LoggingConfig,
    MemoryCacheConfig, ServerConfig,
};
use rolegate_database::memory::{MemoryStore, fixtures};
use rolegate_entity::feature::Feature;
use rolegate_entity::grant::PermissionFlags;
use rolegate_entity::role::Role;
use rolegate_entity::user::User;

const PRIVATE_PEM: &[u8] = include_bytes!("../../crates/rolegate-auth/src/jwt/testdata/private.pem");
const PUBLIC_PEM: &[u8] = include_bytes!("../../crates/rolegate-auth/src/jwt/testdata/public.pem");

pub const PASSWORD: &str = "Secret1!";
pub const ADMIN_EMAIL: &str = "a@b.com";
pub const ADMIN_PHONE: &str = "0812345678";
pub const VIEWER_EMAIL: &str = "v@b.com";
pub const INACTIVE_EMAIL: &str = "x@b.com";

/// Test application context over an in-memory store and cache.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The store behind the router, for seeding and direct assertions
    pub store: Arc<MemoryStore>,
    pub decoder: JwtDecoder,
    /// Level 50, every flag on every feature
    pub admin: User,
    pub admin_role: Role,
    /// Level 10, may view users and view/edit roles
    pub viewer: User,
    pub viewer_role: Role,
    /// `users`, `roles`, `features`, in menu order
    pub features: Vec<Feature>,
}

impl TestApp {
    /// Create a new test application with seeded users, roles and grants.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let hash = PasswordHasher::new().hash(PASSWORD).unwrap();

        let features: Vec<Feature> = ["users", "roles", "features"]
            .iter()
            .zip(1..)
            .map(|(slug, seq)| fixtures::feature(slug, seq))
            .collect();
        for feature in &features {
            store.insert_feature(feature.clone());
        }

        let admin_role = fixtures::role("admin", 50);
        store.insert_role(admin_role.clone());
        for feature in &features {
            store.insert_grant(fixtures::grant(
                admin_role.id,
                feature.id,
                PermissionFlags::all(),
            ));
        }

        let viewer_role = fixtures::role("viewer", 10);
        store.insert_role(viewer_role.clone());
        store.insert_grant(fixtures::grant(
            viewer_role.id,
            features[0].id,
            PermissionFlags {
                is_view: true,
                ..Default::default()
            },
        ));
        store.insert_grant(fixtures::grant(
            viewer_role.id,
            features[1].id,
            PermissionFlags {
                is_view: true,
                is_edit: true,
                ..Default::default()
            },
        ));

        let mut admin = fixtures::user(ADMIN_EMAIL, ADMIN_PHONE, &hash);
        admin.role_id = Some(admin_role.id);
        store.insert_user(admin.clone());

        let mut viewer = fixtures::user(VIEWER_EMAIL, "0899999999", &hash);
        viewer.role_id = Some(viewer_role.id);
        store.insert_user(viewer.clone());

        let mut inactive = fixtures::user(INACTIVE_EMAIL, "0877777777", &hash);
        inactive.is_active = false;
        store.insert_user(inactive);

        let config = test_config();
        let cache = Arc::new(CacheManager::in_memory(&config.cache.memory));
        let encoder = JwtEncoder::from_pem(
            PRIVATE_PEM,
            chrono::Duration::minutes(config.auth.access_ttl_minutes as i64),
            chrono::Duration::hours(config.auth.refresh_ttl_hours as i64),
        )
        .unwrap();
        let decoder = JwtDecoder::from_pem(PUBLIC_PEM, 0).unwrap();

        let state = AppState::assemble(
            Stores::shared(store.clone()),
            cache,
            encoder,
            decoder.clone(),
            &config,
        );
        let router = build_app(state, &CorsConfig::default());

        Self {
            router,
            store,
            decoder,
            admin,
            admin_role,
            viewer,
            viewer_role,
            features,
        }
    }

    /// Send a request and return the status and the JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Log in and return `(accessToken, refreshToken)`.
    pub async fn login(&self, identifier: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(serde_json::json!({ "identifier": identifier, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
            run_migrations: false,
        },
        cache: CacheConfig {
            memory: MemoryCacheConfig { max_capacity: 1000 },
            ..CacheConfig::default()
        },
        auth: AuthConfig {
            private_key_path: String::new(),
            public_key_path: String::new(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 72,
            leeway_seconds: 0,
            store_timeout_ms: 1000,
            password_min_length: 8,
            password_max_length: 16,
        },
        logging: LoggingConfig::default(),
    }
}

/// The machine-readable error code of an error body.
pub fn code(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}
