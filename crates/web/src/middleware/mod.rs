//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. Locale provider (UI language)
//! 5. Color mode provider (light/dark/system)
//!
//! Layers 3-5 are installed together by [`compose_providers`] so their
//! nesting cannot drift: both providers read preferences out of the session.

pub mod auth;
pub mod color_mode;
pub mod locale;
pub mod session;

use axum::Router;
use tower::ServiceBuilder;
use tower_sessions::{SessionManagerLayer, SessionStore};

pub use auth::{
    OptionalAuth, RequireAdmin, RequireAuth, clear_auth_session, load_auth_session,
    set_auth_session,
};
pub use color_mode::provide_color_mode;
pub use locale::provide_locale;
pub use session::{create_session_layer, postgres_store};

/// Wrap `router` in the request-context providers.
///
/// Session is outermost, then locale, then color mode, then the routes.
pub fn compose_providers<St, S>(
    router: Router<St>,
    session_layer: SessionManagerLayer<S>,
) -> Router<St>
where
    St: Clone + Send + Sync + 'static,
    S: SessionStore + Clone,
{
    router.layer(
        ServiceBuilder::new()
            .layer(session_layer)
            .layer(axum::middleware::from_fn(provide_locale))
            .layer(axum::middleware::from_fn(provide_color_mode)),
    )
}
