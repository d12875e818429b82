//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (database)
//! GET  /manifest.webmanifest           - Web app manifest
//!
//! # Auth
//! GET  /api/auth/registration-status   - Whether sign-up is open
//! GET  /api/auth/session               - Current session or {}
//! POST /api/auth/signout               - Clear the session
//!
//! # Preferences
//! GET  /api/preferences                - Resolved locale and color mode
//! PUT  /api/preferences                - Save locale and/or color mode
//!
//! # Admin (requires admin role)
//! GET  /api/admin/settings             - Feature flags
//! ```

pub mod api;
pub mod auth;
pub mod health;
pub mod manifest;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::{compose_providers, create_session_layer};
use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registration-status", get(auth::registration_status))
        .route("/session", get(auth::current_session))
        .route("/signout", post(auth::sign_out))
}

/// All application routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/manifest.webmanifest", get(manifest::webmanifest))
        .nest("/api/auth", auth_routes())
        .merge(api::router())
}

/// Build the application with providers and request tracing installed.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    compose_providers(routes(), session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
