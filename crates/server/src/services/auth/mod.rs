//! Authentication service.
//!
//! Password registration and login for both users and admins, plus the
//! signed tokens handed out on login.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, Role, TokenSigner};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use recipe_box_core::Email;

use crate::db::{RepositoryError, Store};
use crate::models::{Admin, NewAdmin, NewUser, User};

/// Authentication service.
///
/// Borrows the store for the duration of a request.
pub struct AuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a new user.
    ///
    /// Emails are not unique among users, so this never conflicts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails, or
    /// `AuthError::Repository` if the insert fails.
    pub async fn register_user(
        &self,
        username: &str,
        email: Email,
        password: &str,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_owned(),
                email,
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Login as a user.
    ///
    /// When several users share an email, only the oldest one can log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// malformed, or the password is wrong.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .store
            .get_user_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    // =========================================================================
    // Admins
    // =========================================================================

    /// Register a new admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminAlreadyExists` if the email is taken.
    pub async fn register_admin(
        &self,
        name: &str,
        email: Email,
        password: &str,
    ) -> Result<Admin, AuthError> {
        if self.store.get_admin_by_email(&email).await?.is_some() {
            return Err(AuthError::AdminAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        // The lookup above can race a concurrent registration; the store
        // still refuses the duplicate.
        let admin = self
            .store
            .create_admin(NewAdmin {
                name: name.to_owned(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(admin)
    }

    /// Login as an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// malformed, or the password is wrong.
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<Admin, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (admin, password_hash) = self
            .store
            .get_admin_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(admin)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
