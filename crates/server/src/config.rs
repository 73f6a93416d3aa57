//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RECIPES_TOKEN_SECRET` - Session token signing secret (min 32 chars, high entropy)
//! - `RECIPES_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; not needed when `RECIPES_STORAGE=memory`)
//!
//! ## Optional
//! - `RECIPES_STORAGE` - `postgres` (default) or `memory`
//! - `RECIPES_HOST` - Bind address (default: 127.0.0.1)
//! - `RECIPES_PORT` - Listen port (default: 3000)
//! - `RECIPES_ALLOWED_ORIGIN` - The one origin allowed by CORS (default: <http://localhost:3001>)
//! - `RECIPES_MAX_BODY_BYTES` - Request body cap (default: 10 MiB)
//! - `RECIPES_TOKEN_TTL_HOURS` - Session token lifetime, 1 to 8784 (default: 24)
//! - `RECIPES_LOG_FORMAT` - `pretty` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Longest accepted session token lifetime (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// Default request body cap (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where records are kept.
#[derive(Debug, Clone)]
pub enum Storage {
    /// `PostgreSQL` via a sqlx pool.
    Postgres { database_url: SecretString },
    /// Process-local maps; everything is lost on restart.
    Memory,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Storage backend
    pub storage: Storage,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// The single origin allowed to make cross-origin requests
    pub allowed_origin: String,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
    /// Session token signing secret
    pub token_secret: SecretString,
    /// Session token lifetime in hours
    pub token_ttl_hours: i64,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the token secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let storage = match vars
            .or_default("RECIPES_STORAGE", "postgres")
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => Storage::Postgres {
                database_url: vars.database_url("RECIPES_DATABASE_URL")?,
            },
            "memory" => Storage::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "RECIPES_STORAGE".to_string(),
                    format!("unknown storage '{other}' (expected postgres or memory)"),
                ));
            }
        };

        let token_secret = vars.validated_secret("RECIPES_TOKEN_SECRET")?;
        validate_secret_length(&token_secret, "RECIPES_TOKEN_SECRET")?;

        let token_ttl_hours: i64 = vars.parse("RECIPES_TOKEN_TTL_HOURS", "24")?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            return Err(ConfigError::InvalidEnvVar(
                "RECIPES_TOKEN_TTL_HOURS".to_string(),
                format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
            ));
        }

        Ok(Self {
            storage,
            host: vars.parse("RECIPES_HOST", "127.0.0.1")?,
            port: vars.parse("RECIPES_PORT", "3000")?,
            allowed_origin: vars.or_default("RECIPES_ALLOWED_ORIGIN", "http://localhost:3001"),
            max_body_bytes: vars.parse(
                "RECIPES_MAX_BODY_BYTES",
                &DEFAULT_MAX_BODY_BYTES.to_string(),
            )?,
            token_secret,
            token_ttl_hours,
            log_format: vars.parse("RECIPES_LOG_FORMAT", "pretty")?,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup shared by the loaders below.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        (self.0)(primary_key)
            .or_else(|| (self.0)("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }

    /// Get an optional variable; empty counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) into `T`.
    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
