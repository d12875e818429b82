//! Authentication extractors built on the session guard.
//!
//! The session itself is written by the auth provider; these extractors only
//! read it. Expired sessions are treated the same as missing ones.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use mistake_book_core::{AuthSession, is_admin_session};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session_keys;

/// Sign-in page for browser requests.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Read the current, unexpired auth session.
pub async fn load_auth_session(session: &Session) -> Option<AuthSession> {
    session
        .get::<AuthSession>(session_keys::AUTH_SESSION)
        .await
        .ok()
        .flatten()
        .filter(|s| !s.is_expired_at(Utc::now()))
}

/// Error returned when an extractor's requirements are not met.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    /// Redirect to sign-in page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in, but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(SIGN_IN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only administrators can access this resource",
            )
                .into_response(),
        }
    }
}

fn missing_session(parts: &Parts) -> AuthRejection {
    if parts.uri.path().starts_with("/api/") {
        AuthRejection::Unauthorized
    } else {
        AuthRejection::RedirectToLogin
    }
}

async fn require_session(parts: &Parts) -> Result<AuthSession, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    load_auth_session(session)
        .await
        .ok_or_else(|| missing_session(parts))
}

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(session): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", session.user.id)
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_session(parts).await.map(Self)
    }
}

/// Extractor that requires a signed-in admin.
///
/// Not signed in behaves like [`RequireAuth`]; signed in without the admin
/// role returns 403 Forbidden.
pub struct RequireAdmin(pub AuthSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = require_session(parts).await?;

        if !is_admin_session(Some(&session)) {
            tracing::warn!(user_id = %session.user.id, path = %parts.uri.path(), "Non-admin denied");
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(session))
    }
}

/// Extractor that optionally gets the current session.
///
/// Never rejects the request.
pub struct OptionalAuth(pub Option<AuthSession>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => load_auth_session(session).await,
            None => None,
        };

        Ok(Self(auth))
    }
}

/// Store the authenticated session (called by the auth provider on sign-in).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_session(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_SESSION, auth).await?;
    set_sentry_user(&auth.user.id, auth.user.email.as_deref());
    Ok(())
}

/// Remove the authenticated session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<AuthSession>(session_keys::AUTH_SESSION)
        .await?;
    clear_sentry_user();
    Ok(())
}
