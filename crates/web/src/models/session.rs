//! Session-related types.

/// Session keys for authentication and preference data.
pub mod keys {
    /// Key for the authenticated session written by the auth provider.
    pub const AUTH_SESSION: &str = "auth_session";

    /// Key for the user's preferred UI language.
    pub const LOCALE: &str = "locale";

    /// Key for the user's preferred color mode.
    pub const COLOR_MODE: &str = "color_mode";
}
