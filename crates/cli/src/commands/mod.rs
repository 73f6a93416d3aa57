//! CLI subcommands.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;

/// Missing configuration for a command.
#[derive(Debug, thiserror::Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVar(pub &'static str);

/// `RECIPES_DATABASE_URL`, falling back to `DATABASE_URL`.
fn database_url() -> Result<SecretString, MissingEnvVar> {
    dotenvy::dotenv().ok();

    std::env::var("RECIPES_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingEnvVar("RECIPES_DATABASE_URL"))
}
