//! Recipe collection routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use recipe_box_core::RecipeId;

use super::required;
use super::users::ListResponse;
use crate::error::{AppError, Result};
use crate::extract::JsonBody;
use crate::middleware::RequireAdmin;
use crate::models::{NewRecipe, Recipe};
use crate::state::AppState;

/// List all recipes.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse<Recipe>>> {
    let recipes = state.store().list_recipes().await?;
    Ok(Json(ListResponse::ok(recipes)))
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub image: Option<String>,
}

impl CreateRecipeRequest {
    /// A title and at least one ingredient and instruction are required.
    fn validate(self) -> Option<NewRecipe> {
        let title = required(self.title)?;
        let ingredients = self.ingredients.filter(|list| !list.is_empty())?;
        let instructions = self.instructions.filter(|list| !list.is_empty())?;

        Some(NewRecipe {
            title,
            ingredients,
            instructions,
            image: required(self.image),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub message: &'static str,
    pub data: Recipe,
}

/// Add a recipe. Open to any caller.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<CreateRecipeResponse>)> {
    let recipe = body
        .validate()
        .ok_or_else(|| AppError::BadRequest("All fields are required".to_owned()))?;

    let recipe = state.store().create_recipe(recipe).await?;

    tracing::info!(recipe_id = %recipe.id, "Recipe added");

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            message: "Recipe added successfully",
            data: recipe,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub message: &'static str,
}

/// Delete a recipe. Admin only.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin_id): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeleteRecipeResponse>> {
    let not_found = || AppError::NotFound("Recipe not found".to_owned());
    let id: RecipeId = id.parse().map_err(|_| not_found())?;

    state.store().delete_recipe(id).await?.ok_or_else(not_found)?;

    tracing::info!(recipe_id = %id, %admin_id, "Recipe deleted");

    Ok(Json(DeleteRecipeResponse {
        message: "Recipe deleted successfully",
    }))
}
