//! Language provider.
//!
//! Resolves the UI language for each request and makes it available to
//! handlers as `Extension<Locale>`. A preference stored in the session wins
//! over `Accept-Language`; Chinese is the fallback.

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::models::{Locale, session_keys};

/// Pick the request locale.
#[must_use]
pub fn resolve_locale(stored: Option<Locale>, accept_language: Option<&str>) -> Locale {
    stored
        .or_else(|| accept_language.and_then(Locale::from_accept_language))
        .unwrap_or_default()
}

/// Middleware installing the request [`Locale`].
pub async fn provide_locale(mut request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let stored = match session {
        Some(session) => session
            .get::<Locale>(session_keys::LOCALE)
            .await
            .ok()
            .flatten(),
        None => None,
    };
    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let locale = resolve_locale(stored, accept_language);
    request.extensions_mut().insert(locale);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers
        .entry(header::CONTENT_LANGUAGE)
        .or_insert(HeaderValue::from_static(locale.language_tag()));
    headers.append(header::VARY, HeaderValue::from_static("Accept-Language"));
    response
}
