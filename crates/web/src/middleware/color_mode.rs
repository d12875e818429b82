//! Color mode provider.
//!
//! Resolves light/dark/system for each request and makes it available to
//! handlers as `Extension<ColorMode>`. A preference stored in the session
//! wins over the `Sec-CH-Prefers-Color-Scheme` client hint.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::models::{ColorMode, session_keys};

/// Client hint carrying the browser's preferred scheme.
pub static PREFERS_COLOR_SCHEME: HeaderName =
    HeaderName::from_static("sec-ch-prefers-color-scheme");

static ACCEPT_CH: HeaderName = HeaderName::from_static("accept-ch");

/// Pick the request color mode.
#[must_use]
pub fn resolve_color_mode(stored: Option<ColorMode>, client_hint: Option<&str>) -> ColorMode {
    stored
        .or_else(|| client_hint.and_then(ColorMode::from_client_hint))
        .unwrap_or_default()
}

/// Middleware installing the request [`ColorMode`].
pub async fn provide_color_mode(mut request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let stored = match session {
        Some(session) => session
            .get::<ColorMode>(session_keys::COLOR_MODE)
            .await
            .ok()
            .flatten(),
        None => None,
    };
    let hint = request
        .headers()
        .get(&PREFERS_COLOR_SCHEME)
        .and_then(|v| v.to_str().ok());

    let mode = resolve_color_mode(stored, hint);
    request.extensions_mut().insert(mode);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        ACCEPT_CH.clone(),
        HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
    );
    headers.append(
        header::VARY,
        HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
    );
    response
}
