//! Recipe Box Core - Shared types library.
//!
//! Used by the `server` binary and the `cli` tools. The crate holds only
//! types: no I/O, no database access, no HTTP.
//!
//! # Modules
//!
//! - [`types`] - Typed record identifiers and a validated email address

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
