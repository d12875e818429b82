//! Auth-related API handlers.
//!
//! Sign-in itself belongs to the auth provider. These handlers expose what
//! the client needs around it: whether sign-up is open, the current session,
//! and sign-out.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::config::FeatureFlags;
use crate::error::Result;
use crate::middleware::{OptionalAuth, clear_auth_session};
use crate::state::AppState;

/// Body of `GET /api/auth/registration-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub allow_registration: bool,
}

impl From<&FeatureFlags> for RegistrationStatus {
    fn from(flags: &FeatureFlags) -> Self {
        Self {
            allow_registration: flags.registration_allowed(),
        }
    }
}

/// Report whether public registration is open.
pub async fn registration_status(State(state): State<AppState>) -> Json<RegistrationStatus> {
    Json(RegistrationStatus::from(&state.config().features))
}

/// Return the current session, or `{}` when signed out.
pub async fn current_session(OptionalAuth(auth): OptionalAuth) -> Response {
    match auth {
        Some(auth) => Json(auth).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}

/// Sign out of the current session.
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn sign_out(session: Session) -> Result<StatusCode> {
    clear_auth_session(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
