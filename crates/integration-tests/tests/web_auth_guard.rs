//! Integration tests for session readback and the admin guard.

use axum::http::{StatusCode, header};
use mistake_book_integration_tests::{TEST_PAGE_PATH, TestApp, body_json, body_text};
use mistake_book_web::middleware::auth::SIGN_IN_PATH;
use serde_json::json;

const ADMIN_SETTINGS: &str = "/api/admin/settings";

#[tokio::test]
async fn test_session_is_empty_when_signed_out() {
    let app = TestApp::new();
    let response = app.get("/api/auth/session", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_session_carries_id_and_role() {
    let app = TestApp::new();
    let cookie = app.sign_in("student-1", Some("user")).await;

    let body = body_json(app.get("/api/auth/session", Some(&cookie)).await).await;
    assert_eq!(body["user"]["id"], "student-1");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["expires"].is_string());
}

#[tokio::test]
async fn test_admin_route_requires_session() {
    let app = TestApp::new();
    let response = app.get(ADMIN_SETTINGS, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_route_forbids_plain_user() {
    let app = TestApp::new();
    let cookie = app.sign_in("student-1", Some("user")).await;
    let response = app.get(ADMIN_SETTINGS, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_route_forbids_missing_role() {
    let app = TestApp::new();
    let cookie = app.sign_in("student-2", None).await;
    let response = app.get(ADMIN_SETTINGS, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_route_allows_admin() {
    let app = TestApp::with_env(&[("ALLOW_REGISTRATION", "false")]);
    let cookie = app.sign_in("teacher-1", Some("admin")).await;

    let response = app.get(ADMIN_SETTINGS, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "features": { "allowRegistration": false },
            "registrationAllowed": false
        })
    );
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let app = TestApp::new();
    let cookie = app.sign_in("teacher-1", Some("admin")).await;

    let response = app
        .send_json("POST", "/api/auth/signout", Some(&cookie), &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(ADMIN_SETTINGS, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(app.get("/api/auth/session", Some(&cookie)).await).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_unknown_cookie_is_signed_out() {
    let app = TestApp::new();
    let response = app
        .get("/api/auth/session", Some("mb_session=not-a-real-session"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_page_redirects_to_sign_in_when_signed_out() {
    let app = TestApp::new();
    let response = app.get(TEST_PAGE_PATH, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), SIGN_IN_PATH);
}

#[tokio::test]
async fn test_page_serves_signed_in_user() {
    let app = TestApp::new();
    let cookie = app.sign_in("student-2", None).await;

    let response = app.get(TEST_PAGE_PATH, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "student-2");
}
