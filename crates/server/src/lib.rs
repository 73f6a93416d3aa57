//! Recipe Box server library.
//!
//! The HTTP API for users, recipes and admins, exposed as a library so the
//! CLI and the integration tests can reuse the store, services and router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_router;
