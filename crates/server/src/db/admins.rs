//! Admin collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use recipe_box_core::{AdminId, Email};

use super::{PgStore, RepositoryError, conflict_or_database, stored_email};
use crate::models::{Admin, NewAdmin};

/// Storage operations on the admin collection.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// All admins, oldest first.
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError>;

    /// Look up an admin by email.
    async fn get_admin_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError>;

    /// Whether at least one admin exists.
    async fn any_admin(&self) -> Result<bool, RepositoryError>;

    /// Insert an admin.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError>;

    /// An admin together with their password hash.
    async fn get_admin_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AdminId::new(row.id),
            name: row.name,
            email: stored_email(&row.email)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AdminPasswordRow {
    #[sqlx(flatten)]
    admin: AdminRow,
    password_hash: String,
}

#[async_trait]
impl AdminStore for PgStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminRow>(
            r"
            SELECT id, name, email, created_at
            FROM recipe_box.admins
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_admin_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            SELECT id, name, email, created_at
            FROM recipe_box.admins
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn any_admin(&self) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (SELECT 1 FROM recipe_box.admins)
            ",
        )
        .fetch_one(self.pool())
        .await?;

        Ok(exists)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO recipe_box.admins (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at
            ",
        )
        .bind(&admin.name)
        .bind(admin.email.as_str())
        .bind(&admin.password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(|e| conflict_or_database(e, "admin email"))?;

        row.try_into()
    }

    async fn get_admin_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminPasswordRow>(
            r"
            SELECT id, name, email, created_at, password_hash
            FROM recipe_box.admins
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };
        Ok(Some((Admin::try_from(r.admin)?, r.password_hash)))
    }
}
