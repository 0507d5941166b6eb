use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    database::{
        get_connection,
        queries::{get_tag, insert_tag, list_tags},
    },
    domain::NewTag,
    responses::TagResponse,
    startup::ApplicationState,
};

use super::ApiError;

#[derive(serde::Deserialize, Debug)]
pub struct TagBody {
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[tracing::instrument(name = "Listing tags", skip(app_state))]
pub async fn get_tags(
    State(app_state): State<ApplicationState>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let tags = list_tags(&mut connection).await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[tracing::instrument(name = "Fetching a tag", skip(app_state))]
pub async fn get_tag_by_id(
    State(app_state): State<ApplicationState>,
    Path(tag_id): Path<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let tag = get_tag(&mut connection, tag_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag", tag_id))?;
    Ok(Json(TagResponse::from(tag)))
}

#[tracing::instrument(name = "Creating a tag", skip(app_state))]
pub async fn create_tag(
    State(app_state): State<ApplicationState>,
    Json(body): Json<TagBody>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let new_tag = NewTag::try_from(body)?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let tag = insert_tag(&mut connection, &new_tag)
        .await
        .map_err(ApiError::from_database)?;
    Ok((StatusCode::CREATED, Json(TagResponse::from(tag))))
}
