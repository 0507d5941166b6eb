use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    database::{
        get_connection,
        queries::{get_ingredient, insert_ingredient, list_ingredients},
    },
    domain::NewIngredient,
    responses::IngredientResponse,
    startup::ApplicationState,
};

use super::ApiError;

#[derive(serde::Deserialize, Debug)]
pub struct IngredientBody {
    pub name: String,
    pub measurement_unit: String,
}

#[derive(serde::Deserialize, Debug)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

#[tracing::instrument(name = "Listing ingredients", skip(app_state))]
pub async fn get_ingredients(
    State(app_state): State<ApplicationState>,
    Query(search): Query<IngredientSearch>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let ingredients = list_ingredients(&mut connection, search.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

#[tracing::instrument(name = "Fetching an ingredient", skip(app_state))]
pub async fn get_ingredient_by_id(
    State(app_state): State<ApplicationState>,
    Path(ingredient_id): Path<i32>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let ingredient = get_ingredient(&mut connection, ingredient_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Ingredient", ingredient_id))?;
    Ok(Json(IngredientResponse::from(ingredient)))
}

#[tracing::instrument(name = "Creating an ingredient", skip(app_state))]
pub async fn create_ingredient(
    State(app_state): State<ApplicationState>,
    Json(body): Json<IngredientBody>,
) -> Result<(StatusCode, Json<IngredientResponse>), ApiError> {
    let new_ingredient = NewIngredient::try_from(body)?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let ingredient = insert_ingredient(&mut connection, &new_ingredient)
        .await
        .map_err(ApiError::from_database)?;
    Ok((StatusCode::CREATED, Json(IngredientResponse::from(ingredient))))
}
