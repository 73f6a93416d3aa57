//! Storage for the three collections: users, recipes and admins.
//!
//! Handlers talk to a [`Store`], which is the union of one trait per
//! collection. Two backends implement it:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (production)
//! - [`MemoryStore`] - process-local maps (tests and local demos)
//!
//! # Tables (`recipe_box` schema)
//!
//! - `users` - username, email (not unique), argon2 password hash
//! - `recipes` - title, `TEXT[]` ingredients and instructions, optional image
//! - `admins` - name, unique email, argon2 password hash
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p recipe-box-cli -- migrate
//! ```

pub mod admins;
pub mod memory;
pub mod recipes;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admins::AdminStore;
pub use memory::MemoryStore;
pub use recipes::RecipeStore;
pub use users::UserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Everything the HTTP layer needs from storage.
#[async_trait]
pub trait Store: UserStore + RecipeStore + AdminStore {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL`-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Embedded migrations from `crates/server/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Turn a unique-index violation into `Conflict`, anything else into `Database`.
fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
    }
    RepositoryError::Database(err)
}

/// Parse an email read back from the database.
fn stored_email(raw: &str) -> Result<recipe_box_core::Email, RepositoryError> {
    recipe_box_core::Email::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}
