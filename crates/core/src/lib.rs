//! Mistake Book Core - Shared types library.
//!
//! This crate provides common types used across all Mistake Book components:
//! - `web` - HTTP server (routes, middleware, session handling)
//! - `cli` - Command-line tools for migrations and database snapshots
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe string IDs
//! - [`session`] - The session and token shape shared with the auth provider
//! - [`auth`] - Role predicate and session guard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod session;
pub mod types;

pub use auth::{ADMIN_ROLE, HasRole, is_admin, is_admin_session};
pub use session::{AuthSession, SessionUser, TokenClaims};
pub use types::*;
