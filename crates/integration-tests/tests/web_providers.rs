//! Integration tests for the session, language and color mode providers.

use axum::http::{HeaderValue, StatusCode, header};
use mistake_book_integration_tests::{TestApp, body_json, session_cookie};
use serde_json::json;

#[tokio::test]
async fn test_defaults_without_hints() {
    let app = TestApp::new();
    let response = app.get("/api/preferences", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_LANGUAGE).unwrap(),
        "zh-CN"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "locale": "zh", "colorMode": "system" })
    );
}

#[tokio::test]
async fn test_request_hints_are_used() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/api/preferences")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header("sec-ch-prefers-color-scheme", "\"dark\"")
        .body(axum::body::Body::empty())
        .unwrap();

    let body = body_json(app.send(request).await).await;
    assert_eq!(body, json!({ "locale": "en", "colorMode": "dark" }));
}

#[tokio::test]
async fn test_vary_order_reflects_nesting() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;

    // Responses unwind innermost first: color mode, then language.
    let vary: Vec<&HeaderValue> = response.headers().get_all(header::VARY).iter().collect();
    assert_eq!(
        vary,
        [
            &HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
            &HeaderValue::from_static("Accept-Language"),
        ]
    );
}

#[tokio::test]
async fn test_providers_read_preferences_from_session() {
    let app = TestApp::new();

    let response = app
        .send_json(
            "PUT",
            "/api/preferences",
            None,
            &json!({ "locale": "en", "colorMode": "light" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(
        body_json(response).await,
        json!({ "locale": "en", "colorMode": "light" })
    );

    // The stored preference beats the request headers.
    let request = axum::http::Request::builder()
        .uri("/api/preferences")
        .header(header::COOKIE, &cookie)
        .header(header::ACCEPT_LANGUAGE, "zh-CN")
        .header("sec-ch-prefers-color-scheme", "dark")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.headers().get(header::CONTENT_LANGUAGE).unwrap(), "en");
    assert_eq!(
        body_json(response).await,
        json!({ "locale": "en", "colorMode": "light" })
    );
}

#[tokio::test]
async fn test_partial_update_keeps_other_preference() {
    let app = TestApp::new();
    let response = app
        .send_json("PUT", "/api/preferences", None, &json!({ "colorMode": "dark" }))
        .await;
    assert_eq!(
        body_json(response).await,
        json!({ "locale": "zh", "colorMode": "dark" })
    );
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let app = TestApp::new();
    let response = app
        .send_json("PUT", "/api/preferences", None, &json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
