//! Integration test harness for Mistake Book.
//!
//! Builds the real router around an in-memory session store and a lazily
//! connected pool, then drives it with `tower::ServiceExt::oneshot`. Nothing
//! here needs a running database unless a test hits `/health/ready`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mistake-book-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use mistake_book_core::{AuthSession, SessionUser};
use mistake_book_web::config::AppConfig;
use mistake_book_web::middleware::{
    RequireAuth, compose_providers, create_session_layer, set_auth_session,
};
use mistake_book_web::routes;
use mistake_book_web::state::AppState;

/// Database URL for the lazily-connected pool.
pub const TEST_DATABASE_URL: &str = "postgres://localhost/mistake_book_test";

/// Path of the sign-in route only the harness mounts.
pub const TEST_SIGN_IN_PATH: &str = "/test/signin";

/// Path of a signed-in-only page only the harness mounts.
pub const TEST_PAGE_PATH: &str = "/test/notebook";

/// Router under test.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Build the app with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Build the app with extra environment variables.
    #[must_use]
    pub fn with_env(vars: &[(&str, &str)]) -> Self {
        let mut map: HashMap<String, String> = HashMap::new();
        map.insert("DATABASE_URL".to_string(), TEST_DATABASE_URL.to_string());
        for (k, v) in vars {
            map.insert((*k).to_string(), (*v).to_string());
        }
        let config = AppConfig::from_lookup(|key| map.get(key).cloned()).unwrap();

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(TEST_DATABASE_URL)
            .unwrap();
        let state = AppState::new(config, pool);

        let session_layer = create_session_layer(MemoryStore::default(), state.config());
        let app_routes = routes::routes()
            .route(TEST_SIGN_IN_PATH, post(test_sign_in))
            .route(TEST_PAGE_PATH, get(test_page));
        let router = compose_providers(app_routes, session_layer).with_state(state.clone());

        Self { router, state }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET` with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Send a JSON body with an optional session cookie.
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: &serde_json::Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Sign in a user with the given role and return the session cookie.
    pub async fn sign_in(&self, id: &str, role: Option<&str>) -> String {
        let mut user = SessionUser::new(id);
        user.role = role.map(String::from);
        let response = self
            .send_json(
                "POST",
                TEST_SIGN_IN_PATH,
                None,
                &serde_json::to_value(&user).unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        session_cookie(&response).expect("sign-in must set a session cookie")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in for the auth provider's sign-in callback.
async fn test_sign_in(session: Session, Json(user): Json<SessionUser>) -> StatusCode {
    let auth = AuthSession {
        user,
        expires: Utc::now() + Duration::days(1),
    };
    set_auth_session(&session, &auth).await.unwrap();
    StatusCode::NO_CONTENT
}

/// Page that needs a signed-in user.
async fn test_page(RequireAuth(auth): RequireAuth) -> String {
    auth.user.id.to_string()
}

/// Extract `name=value` of the session cookie from a response.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(mistake_book_web::middleware::session::SESSION_COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
