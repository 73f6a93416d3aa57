//! User collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use recipe_box_core::{Email, UserId};

use super::{PgStore, RepositoryError, stored_email};
use crate::models::{NewUser, User};

/// Storage operations on the user collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert a user. Emails are not unique, so this never conflicts.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// The oldest user registered with `email`, together with their password hash.
    async fn get_user_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Remove a user, returning the removed record if it existed.
    async fn delete_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            email: stored_email(&row.email)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, created_at
            FROM recipe_box.users
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO recipe_box.users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn get_user_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserPasswordRow>(
            r"
            SELECT id, username, email, created_at, password_hash
            FROM recipe_box.users
            WHERE email = $1
            ORDER BY id ASC
            LIMIT 1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };
        Ok(Some((User::try_from(r.user)?, r.password_hash)))
    }

    async fn delete_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            DELETE FROM recipe_box.users
            WHERE id = $1
            RETURNING id, username, email, created_at
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
