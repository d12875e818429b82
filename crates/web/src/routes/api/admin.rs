//! Admin-only API handlers.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::config::FeatureFlags;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the admin API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/settings", get(settings))
}

/// Effective feature settings as seen by an administrator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    /// Raw flags as configured.
    pub features: FeatureFlags,
    /// Whether sign-up is currently open.
    pub registration_allowed: bool,
}

/// Show the configured feature flags.
pub async fn settings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Json<AdminSettings> {
    tracing::debug!(user_id = %admin.user.id, "Admin settings viewed");

    let features = state.config().features;
    Json(AdminSettings {
        features,
        registration_allowed: features.registration_allowed(),
    })
}
