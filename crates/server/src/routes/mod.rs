//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                    - Banner
//!
//! # Users
//! GET    /user                - List users
//! POST   /adduser             - Register a user
//! POST   /login               - User login (returns token)
//! DELETE /deleteuser/{id}     - Delete a user (self or admin)
//!
//! # Recipes
//! GET    /getrecipe           - List recipes
//! POST   /addrecipes          - Add a recipe
//! DELETE /deleterecipe/{id}   - Delete a recipe (admin)
//!
//! # Admins
//! GET    /admin               - List admins (admin)
//! POST   /admin/register      - Register an admin (admin token once one exists)
//! POST   /admin/login         - Admin login (returns token)
//! ```
//!
//! Health checks are mounted separately in [`crate::app`].

pub mod admins;
pub mod home;
pub mod recipes;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        // Users
        .route("/user", get(users::list))
        .route("/adduser", post(users::create))
        .route("/login", post(users::login))
        .route("/deleteuser/{id}", delete(users::delete))
        // Recipes
        .route("/getrecipe", get(recipes::list))
        .route("/addrecipes", post(recipes::create))
        .route("/deleterecipe/{id}", delete(recipes::delete))
        // Admins
        .route("/admin", get(admins::list))
        .route("/admin/register", post(admins::register))
        .route("/admin/login", post(admins::login))
}

/// Trim a required text field, treating blank as missing.
fn required(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// A required secret field. Whitespace is significant, so it is not trimmed.
fn required_secret(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}
