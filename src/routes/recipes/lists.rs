use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    authentication::CurrentUser,
    database::{
        get_connection,
        queries::{add_recipe_to_list, get_recipe, remove_recipe_from_list, RecipeList},
    },
    responses::ShortRecipeResponse,
    routes::ApiError,
    startup::ApplicationState,
};

async fn add_to_list(
    app_state: ApplicationState,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let recipe = get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe", recipe_id))?;
    if !add_recipe_to_list(&mut connection, list, user_id, recipe.id).await? {
        return Err(ApiError::BadRequest(format!(
            "The recipe is already in your {list}."
        )));
    }
    Ok((
        StatusCode::CREATED,
        Json(ShortRecipeResponse::new(&recipe, &app_state.media)),
    ))
}

async fn remove_from_list(
    app_state: ApplicationState,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    get_recipe(&mut connection, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe", recipe_id))?;
    if !remove_recipe_from_list(&mut connection, list, user_id, recipe_id).await? {
        return Err(ApiError::BadRequest(format!(
            "The recipe is not in your {list}."
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(
    name = "Favoriting a recipe",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn favorite(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_to_list(app_state, RecipeList::Favorites, user.id, recipe_id).await
}

#[tracing::instrument(
    name = "Unfavoriting a recipe",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn unfavorite(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_from_list(app_state, RecipeList::Favorites, user.id, recipe_id).await
}

#[tracing::instrument(
    name = "Adding a recipe to the cart",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn add_to_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_to_list(app_state, RecipeList::ShoppingCart, user.id, recipe_id).await
}

#[tracing::instrument(
    name = "Removing a recipe from the cart",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn remove_from_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_from_list(app_state, RecipeList::ShoppingCart, user.id, recipe_id).await
}
