//! Admin management commands.
//!
//! # Usage
//!
//! ```bash
//! recipes-cli admin create -e admin@example.com -n "Admin Name" -p 'long passphrase'
//! ```
//!
//! # Environment Variables
//!
//! - `RECIPES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `RECIPES_ADMIN_PASSWORD` - Password used when `-p` is not given

use recipe_box_core::{AdminId, Email};
use recipe_box_server::db::{self, PgStore};
use recipe_box_server::services::auth::{AuthError, AuthService};
use thiserror::Error;

use super::{MissingEnvVar, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Admin already exists.
    #[error("Admin already exists with email: {0}")]
    AdminExists(String),

    /// Any other failure from the auth service.
    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new admin.
///
/// Applies the same duplicate-email check and hashing as `POST /admin/register`.
///
/// # Returns
///
/// The ID of the created admin.
///
/// # Errors
///
/// Returns `AdminError` if the email is invalid or taken, no password was
/// supplied, or the database is unreachable.
pub async fn create(
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<AdminId, AdminError> {
    let parsed = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let password = match password {
        Some(password) => password,
        None => std::env::var("RECIPES_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .ok_or(MissingEnvVar("RECIPES_ADMIN_PASSWORD"))?,
    };

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let store = PgStore::new(pool);

    tracing::info!("Creating admin: {}", parsed);

    let admin = AuthService::new(&store)
        .register_admin(name, parsed, &password)
        .await
        .map_err(|e| match e {
            AuthError::AdminAlreadyExists => AdminError::AdminExists(email.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );

    Ok(admin.id)
}
