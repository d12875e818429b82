//! UI preference API handlers.

use axum::{
    Extension, Json, Router,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::models::{ColorMode, Locale, session_keys};
use crate::state::AppState;

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/preferences", get(get_preferences).put(update_preferences))
}

/// Resolved preferences for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub locale: Locale,
    pub color_mode: ColorMode,
}

/// Request for updating preferences. Omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub locale: Option<Locale>,
    pub color_mode: Option<ColorMode>,
}

/// Return the preferences resolved by the providers.
pub async fn get_preferences(
    Extension(locale): Extension<Locale>,
    Extension(color_mode): Extension<ColorMode>,
) -> Json<Preferences> {
    Json(Preferences { locale, color_mode })
}

/// Save preferences to the session.
///
/// # Errors
///
/// Returns `BadRequest` if the body names no preference, or an error if the
/// session store cannot be updated.
pub async fn update_preferences(
    session: Session,
    Extension(locale): Extension<Locale>,
    Extension(color_mode): Extension<ColorMode>,
    Json(body): Json<PreferencesUpdate>,
) -> Result<Json<Preferences>> {
    if body.locale.is_none() && body.color_mode.is_none() {
        return Err(AppError::BadRequest(
            "expected locale or colorMode".to_string(),
        ));
    }

    if let Some(locale) = body.locale {
        session.insert(session_keys::LOCALE, locale).await?;
    }
    if let Some(color_mode) = body.color_mode {
        session.insert(session_keys::COLOR_MODE, color_mode).await?;
    }

    Ok(Json(Preferences {
        locale: body.locale.unwrap_or(locale),
        color_mode: body.color_mode.unwrap_or(color_mode),
    }))
}
