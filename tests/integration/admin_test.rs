//! Permission-gated admin routes and cache invalidation over HTTP.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use rolegate_database::memory::fixtures;

use crate::helpers::{ADMIN_EMAIL, INACTIVE_EMAIL, PASSWORD, TestApp, VIEWER_EMAIL, code};

#[tokio::test]
async fn test_admin_lists_users() {
    let app = TestApp::new();
    let (token, _) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app.get("/users", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPage"], 1);
    let users = body["items"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn test_user_list_pages_and_filters() {
    let app = TestApp::new();
    let (token, _) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app.get("/users?page=2&size=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPage"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (_, body) = app.get("/users?isActive=false", &token).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["email"], INACTIVE_EMAIL);

    let (_, body) = app
        .get(&format!("/users?roleId={}", app.viewer_role.id), &token)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], app.viewer.id.to_string());

    let (_, body) = app.get("/users?phoneNumber=12345", &token).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["email"], ADMIN_EMAIL);

    let (status, body) = app.get("/users?page=first", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION");
}

#[tokio::test]
async fn test_user_changes_own_password() {
    let app = TestApp::new();
    let (token, _) = app.login(VIEWER_EMAIL).await;
    let uri = format!("/users/{}/password", app.viewer.id);

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({ "newPassword": "weak", "confirmNewPassword": "weak" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION");

    let (status, body) = app
        .put(
            &uri,
            &token,
            json!({ "newPassword": "Fresh2@pass", "confirmNewPassword": "Fresh2@pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": VIEWER_EMAIL, "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "identifier": VIEWER_EMAIL, "password": "Fresh2@pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn test_viewer_cannot_change_admin_password() {
    let app = TestApp::new();
    let (token, _) = app.login(VIEWER_EMAIL).await;

    let (status, body) = app
        .put(
            &format!("/users/{}/password", app.admin.id),
            &token,
            json!({ "newPassword": "Fresh2@pass", "confirmNewPassword": "Fresh2@pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_missing_grant_is_forbidden() {
    let app = TestApp::new();
    let (token, _) = app.login(VIEWER_EMAIL).await;

    let (status, body) = app.get("/features", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "FORBIDDEN");

    // View on users does not imply edit.
    let (status, _) = app
        .put(
            &format!("/users/{}", app.viewer.id),
            &token,
            json!({ "firstName": "Eve" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_and_unknown_ids() {
    let app = TestApp::new();
    let (token, _) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app.get("/users/not-a-uuid", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(code(&body), "VALIDATION");

    let (status, body) = app.get(&format!("/roles/{}", Uuid::new_v4()), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(code(&body), "NOT_FOUND");
}

#[tokio::test]
async fn test_role_update_is_visible_on_next_read() {
    let app = TestApp::new();
    let (token, _) = app.login(ADMIN_EMAIL).await;
    let uri = format!("/roles/{}", app.viewer_role.id);

    let (status, before) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["role"]["name"], "viewer");

    let (status, updated) = app
        .put(
            &uri,
            &token,
            json!({
                "name": "auditor",
                "grants": [{ "featureId": app.features[2].id, "isView": true }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");

    let (status, after) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["role"]["name"], "auditor");
    assert_eq!(after["permissions"].as_array().unwrap().len(), 3);

    let (_, roles) = app.get("/roles", &token).await;
    let summary = roles
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["roleId"] == app.viewer_role.id.to_string())
        .unwrap();
    assert_eq!(summary["roleName"], "auditor");
    assert_eq!(summary["numberUser"], 1);
}

#[tokio::test]
async fn test_role_escalation_is_forbidden() {
    let app = TestApp::new();
    let (token, _) = app.login(VIEWER_EMAIL).await;

    let (status, _) = app
        .put(
            &format!("/roles/{}", app.viewer_role.id),
            &token,
            json!({ "level": 90 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/roles/{}", app.admin_role.id),
            &token,
            json!({ "name": "mine" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Within their own level the same caller may edit.
    let (status, _) = app
        .put(
            &format!("/roles/{}", app.viewer_role.id),
            &token,
            json!({ "level": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_assigning_higher_role_is_forbidden() {
    let app = TestApp::new();
    let root = fixtures::role("root", 90);
    app.store.insert_role(root.clone());
    let (token, _) = app.login(ADMIN_EMAIL).await;

    let (status, body) = app
        .put(
            &format!("/users/{}", app.viewer.id),
            &token,
            json!({ "roleId": root.id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_grant_change_applies_to_next_check() {
    let app = TestApp::new();
    let (admin, _) = app.login(ADMIN_EMAIL).await;
    let (viewer, _) = app.login(VIEWER_EMAIL).await;

    // Warm the viewer's role entry in the cache.
    let (status, _) = app.get("/users", &viewer).await;
    assert_eq!(status, StatusCode::OK);

    let (_, grants) = app.get("/role-features", &admin).await;
    let grant_id = grants
        .as_array()
        .unwrap()
        .iter()
        .find(|g| {
            g["roleId"] == app.viewer_role.id.to_string()
                && g["featureId"] == app.features[0].id.to_string()
        })
        .map(|g| g["id"].as_str().unwrap().to_string())
        .unwrap();

    let (status, updated) = app
        .put(
            &format!("/role-features/{grant_id}"),
            &admin,
            json!({ "isView": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isView"], false);

    let (status, body) = app.get("/users", &viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "FORBIDDEN");
}

#[tokio::test]
async fn test_deactivated_user_loses_access() {
    let app = TestApp::new();
    let (admin, _) = app.login(ADMIN_EMAIL).await;
    let (viewer, _) = app.login(VIEWER_EMAIL).await;

    let (status, updated) = app
        .put(
            &format!("/users/{}", app.viewer.id),
            &admin,
            json!({ "isActive": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isActive"], false);

    let (status, body) = app.get("/users", &viewer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(code(&body), "ACCOUNT_DEACTIVATED");
}

#[tokio::test]
async fn test_attached_feature_without_grant_is_server_error() {
    let app = TestApp::new();
    let (viewer, _) = app.login(VIEWER_EMAIL).await;

    app.store
        .attach_feature(app.viewer_role.id, app.features[2].id);
    // The viewer's role is cached from login; an admin write evicts it.
    let (admin, _) = app.login(ADMIN_EMAIL).await;
    let (status, _) = app
        .put(
            &format!("/roles/{}", app.viewer_role.id),
            &admin,
            json!({ "name": "viewer" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = app.get("/auth/me", &viewer).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(code(&body), "PERMISSION_RESOLUTION_INCONSISTENCY");
    assert_eq!(body["message"], "Internal server error");
}
