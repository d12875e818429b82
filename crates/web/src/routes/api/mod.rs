//! JSON API route handlers.

pub mod admin;
pub mod preferences;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(preferences::router())
        .merge(admin::router())
}
