//! Recipe domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recipe_box_core::RecipeId;

/// A stored recipe. Recipes have no owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecipeId,
    pub title: String,
    /// Ingredient lines, in the order the author gave them.
    pub ingredients: Vec<String>,
    /// Steps, in order.
    pub instructions: Vec<String>,
    /// Image URL or data URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A recipe about to be inserted.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: Option<String>,
}
