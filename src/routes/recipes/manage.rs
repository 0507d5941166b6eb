use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection};

use crate::{
    authentication::{CurrentUser, RequestContext},
    database::{
        get_connection,
        queries::{
            delete_recipe, find_missing_ingredient, find_missing_tag, get_recipe,
            insert_recipe, load_recipe_details, update_recipe,
        },
        DatabaseConnection,
    },
    domain::NewRecipe,
    models::Recipe,
    permissions::ensure_author_or_admin,
    responses::RecipeResponse,
    routes::{ApiError, RecipeBody},
    startup::ApplicationState,
};

/// Every ingredient and tag the recipe references must exist.
async fn check_references(
    connection: &mut DatabaseConnection,
    recipe: &NewRecipe,
) -> Result<(), ApiError> {
    let ingredient_ids: Vec<i32> =
        recipe.ingredients.iter().map(|item| item.ingredient_id).collect();
    if let Some(id) = find_missing_ingredient(connection, &ingredient_ids).await? {
        return Err(ApiError::not_found("Ingredient", id));
    }
    if let Some(id) = find_missing_tag(connection, &recipe.tags).await? {
        return Err(ApiError::not_found("Tag", id));
    }
    Ok(())
}

async fn recipe_response(
    connection: &mut DatabaseConnection,
    app_state: &ApplicationState,
    recipe: Recipe,
    viewer_id: Option<i32>,
) -> Result<RecipeResponse, ApiError> {
    let details = load_recipe_details(connection, vec![recipe], viewer_id)
        .await?
        .pop()
        .context("Recipe details went missing.")?;
    Ok(RecipeResponse::from_details(details, &app_state.media))
}

async fn existing_recipe(
    connection: &mut DatabaseConnection,
    recipe_id: i32,
) -> Result<Recipe, ApiError> {
    get_recipe(connection, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe", recipe_id))
}

#[axum_macros::debug_handler]
#[tracing::instrument(
    name = "Creating a recipe",
    skip(app_state, user, body),
    fields(user_id = user.id, recipe_name = %body.name)
)]
pub async fn create_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<RecipeBody>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let new_recipe = NewRecipe::try_from(body)?;
    let image = new_recipe
        .image
        .as_ref()
        .ok_or_else(|| ApiError::field("image", "An image is required."))?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    check_references(&mut connection, &new_recipe).await?;
    let image_path = app_state.media.save_recipe_image(image).await?;

    let author_id = user.id;
    let recipe = &new_recipe;
    let path = image_path.as_str();
    let stored = connection
        .transaction::<_, ApiError, _>(|conn| {
            async move {
                insert_recipe(conn, author_id, recipe, path)
                    .await
                    .map_err(ApiError::from_database)
            }
            .scope_boxed()
        })
        .await;
    let stored = match stored {
        Ok(stored) => stored,
        Err(e) => {
            app_state.media.remove(&image_path).await;
            return Err(e);
        }
    };
    let response =
        recipe_response(&mut connection, &app_state, stored, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(name = "Fetching a recipe", skip(app_state, context))]
pub async fn get_recipe_by_id(
    State(app_state): State<ApplicationState>,
    context: RequestContext,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let recipe = existing_recipe(&mut connection, recipe_id).await?;
    let response =
        recipe_response(&mut connection, &app_state, recipe, context.viewer_id())
            .await?;
    Ok(Json(response))
}

/// Replaces ingredients and tags wholesale; the image only when supplied.
#[tracing::instrument(
    name = "Updating a recipe",
    skip(app_state, user, body),
    fields(user_id = user.id)
)]
pub async fn patch_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
    Json(body): Json<RecipeBody>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let current = existing_recipe(&mut connection, recipe_id).await?;
    ensure_author_or_admin(&user, current.author_id)?;
    let new_recipe = NewRecipe::try_from(body)?;
    check_references(&mut connection, &new_recipe).await?;
    let image_path = match &new_recipe.image {
        Some(image) => Some(app_state.media.save_recipe_image(image).await?),
        None => None,
    };

    let recipe = &new_recipe;
    let path = image_path.as_deref();
    let updated = connection
        .transaction::<_, ApiError, _>(|conn| {
            async move {
                update_recipe(conn, recipe_id, recipe, path)
                    .await
                    .map_err(ApiError::from_database)
            }
            .scope_boxed()
        })
        .await;
    let updated = match updated {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(path) = &image_path {
                app_state.media.remove(path).await;
            }
            return Err(e);
        }
    };
    if image_path.is_some() {
        app_state.media.remove(&current.image).await;
    }
    let response =
        recipe_response(&mut connection, &app_state, updated, Some(user.id)).await?;
    Ok(Json(response))
}

#[tracing::instrument(
    name = "Deleting a recipe",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn remove_recipe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let recipe = existing_recipe(&mut connection, recipe_id).await?;
    ensure_author_or_admin(&user, recipe.author_id)?;
    delete_recipe(&mut connection, recipe_id).await?;
    app_state.media.remove(&recipe.image).await;
    tracing::info!(recipe_id, "Recipe deleted.");
    Ok(StatusCode::NO_CONTENT)
}
