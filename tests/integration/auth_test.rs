//! Login, refresh, logout and bearer authentication over HTTP.

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;

use rolegate_database::AuthorizationStore;

use crate::helpers::{
    ADMIN_EMAIL, ADMIN_PHONE, INACTIVE_EMAIL, PASSWORD, TestApp, VIEWER_EMAIL, code,
};

#[tokio::test]
async fn test_login_returns_tokens_and_permissions() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": ADMIN_EMAIL, "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["userId"], app.admin.id.to_string());
    assert_eq!(body["user"]["roleLevel"], 50);
    assert!(body["user"].get("password").is_none());

    let permissions = body["user"]["permissions"].as_array().unwrap();
    assert_eq!(permissions.len(), app.features.len());
    let slugs: Vec<&str> = permissions
        .iter()
        .map(|p| p["menuSlug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["users", "roles", "features"]);

    let now = Utc::now().timestamp();
    let access = app
        .decoder
        .validate_access(body["accessToken"].as_str().unwrap())
        .unwrap();
    assert_eq!(access.user_id, app.admin.id);
    assert!((access.exp - now - 15 * 60).abs() <= 5);

    let refresh = app
        .decoder
        .validate_refresh(body["refreshToken"].as_str().unwrap())
        .unwrap();
    assert_eq!(refresh.user_id, app.admin.id);
    assert!((refresh.exp - now - 72 * 3600).abs() <= 5);
}

#[tokio::test]
async fn test_login_by_phone_number() {
    let app = TestApp::new();
    let (access, _) = app.login(ADMIN_PHONE).await;
    let claims = app.decoder.validate_access(&access).unwrap();
    assert_eq!(claims.user_id, app.admin.id);
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = TestApp::new();

    let (wrong_status, wrong_body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": ADMIN_EMAIL, "password": "nope" })),
        )
        .await;
    let (unknown_status, unknown_body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": "nobody@b.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&wrong_body), "INVALID_CREDENTIALS");
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_deactivated_account_cannot_login() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": INACTIVE_EMAIL, "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "ACCOUNT_DEACTIVATED");
}

#[tokio::test]
async fn test_malformed_login_body_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": ADMIN_EMAIL })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION");
}

#[tokio::test]
async fn test_relogin_keeps_one_session_row() {
    let app = TestApp::new();
    app.login(ADMIN_EMAIL).await;
    let (access, refresh) = app.login(ADMIN_EMAIL).await;

    assert_eq!(app.store.session_count(app.admin.id), 1);
    let row = app.store.find_by_user(app.admin.id).await.unwrap().unwrap();
    assert_eq!(row.access_token.as_deref(), Some(access.as_str()));
    assert_eq!(row.refresh_token.as_deref(), Some(refresh.as_str()));
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::new();
    let (access, _) = app.login(VIEWER_EMAIL).await;

    let (status, body) = app.get("/auth/me", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], VIEWER_EMAIL);
    assert_eq!(body["roleName"], "viewer");
    assert_eq!(body["permissions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_me_rejects_missing_and_invalid_tokens() {
    let app = TestApp::new();
    let (_, refresh) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app.request(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "UNAUTHORIZED");

    let (status, body) = app.get("/auth/me", "not.a.token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "TOKEN_MALFORMED");

    // Refresh tokens are not bearer credentials.
    let (status, body) = app.get("/auth/me", &refresh).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "TOKEN_MALFORMED");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new();
    let (access, _) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app
        .request(Method::POST, "/auth/logout", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, body) = app.get("/auth/me", &access).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "TOKEN_REVOKED");

    let row = app.store.find_by_user(app.admin.id).await.unwrap().unwrap();
    assert!(row.access_token.is_none());
    assert!(row.refresh_token.is_none());
}

#[tokio::test]
async fn test_logout_twice_succeeds() {
    let app = TestApp::new();
    let (access, _) = app.login(ADMIN_EMAIL).await;

    for _ in 0..2 {
        let (status, _) = app
            .request(Method::POST, "/auth/logout", Some(&access), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_logout_with_invalid_token_changes_nothing() {
    let app = TestApp::new();
    let (access, refresh) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app
        .request(Method::POST, "/auth/logout", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "TOKEN_MALFORMED");

    let row = app.store.find_by_user(app.admin.id).await.unwrap().unwrap();
    assert_eq!(row.access_token.as_deref(), Some(access.as_str()));
    assert_eq!(row.refresh_token.as_deref(), Some(refresh.as_str()));
}

#[tokio::test]
async fn test_refresh_issues_access_token_for_same_user() {
    let app = TestApp::new();
    let (old_access, refresh) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("refreshToken").is_none());

    let new_access = body["accessToken"].as_str().unwrap();
    assert_ne!(new_access, old_access);
    let claims = app.decoder.validate_access(new_access).unwrap();
    assert_eq!(claims.user_id, app.admin.id);

    // The previous access token is left to expire on its own.
    let (status, _) = app.get("/auth/me", &old_access).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/auth/me", new_access).await;
    assert_eq!(status, StatusCode::OK);

    let row = app.store.find_by_user(app.admin.id).await.unwrap().unwrap();
    assert_eq!(row.access_token.as_deref(), Some(new_access));
}

#[tokio::test]
async fn test_refresh_after_logout_is_revoked() {
    let app = TestApp::new();
    let (access, refresh) = app.login(ADMIN_EMAIL).await;

    app.request(Method::POST, "/auth/logout", Some(&access), None)
        .await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code(&body), "TOKEN_REVOKED");
}

#[tokio::test]
async fn test_refresh_with_empty_token_is_validation_error() {
    let app = TestApp::new();
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refreshToken": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["cache"], "connected");
}
