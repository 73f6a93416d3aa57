//! Admin domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::{AdminId, Email};

/// An administrator account.
///
/// Admins live in their own collection, separate from users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Login email, unique across admins.
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// An admin about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
}
