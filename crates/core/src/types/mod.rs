//! Core types for Mistake Book.
//!
//! This module provides type-safe wrappers for entity identifiers.

pub mod id;

pub use id::*;
