//! Domain models.
//!
//! These are validated records as the rest of the server sees them. Storage
//! backends convert their rows into these types; password hashes are never
//! part of a model and so can never be serialized into a response.
//!
//! JSON field names follow the document shape browser clients already use:
//! the identifier is `_id`, everything else is camelCase.

pub mod admin;
pub mod recipe;
pub mod user;

pub use admin::{Admin, NewAdmin};
pub use recipe::{NewRecipe, Recipe};
pub use user::{NewUser, User};
