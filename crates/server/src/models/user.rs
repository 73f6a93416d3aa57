//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::{Email, UserId};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub password_hash: String,
}
