//! Domain models for the web server.
//!
//! Session-facing types live in `mistake_book_core`; this module holds the
//! persisted notebook records and per-request preferences.

pub mod error_item;
pub mod preferences;
pub mod session;

pub use error_item::{ErrorItem, ErrorItemWithTags, Tag};
pub use preferences::{ColorMode, Locale};
pub use session::keys as session_keys;
