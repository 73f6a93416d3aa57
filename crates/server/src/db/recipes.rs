//! Recipe collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use recipe_box_core::RecipeId;

use super::{PgStore, RepositoryError};
use crate::models::{NewRecipe, Recipe};

/// Storage operations on the recipe collection.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes, oldest first.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError>;

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError>;

    /// Remove a recipe, returning the removed record if it existed.
    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError>;
}

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: i32,
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            title: row.title,
            ingredients: row.ingredients,
            instructions: row.instructions,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r"
            SELECT id, title, ingredients, instructions, image, created_at
            FROM recipe_box.recipes
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r"
            INSERT INTO recipe_box.recipes (title, ingredients, instructions, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, ingredients, instructions, image, created_at
            ",
        )
        .bind(&recipe.title)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(&recipe.image)
        .fetch_one(self.pool())
        .await?;

        Ok(row.into())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r"
            DELETE FROM recipe_box.recipes
            WHERE id = $1
            RETURNING id, title, ingredients, instructions, image, created_at
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Recipe::from))
    }
}
