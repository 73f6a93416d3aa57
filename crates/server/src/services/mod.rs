//! Business logic that sits between the HTTP handlers and the store.

pub mod auth;
