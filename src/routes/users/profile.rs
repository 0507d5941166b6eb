use anyhow::Context;
use axum::{extract::State, Json};

use crate::{
    authentication::CurrentUser,
    database::{
        get_connection,
        queries::{get_user, update_user},
    },
    domain::UserUpdate,
    models::UserChangeset,
    responses::UserResponse,
    routes::{ApiError, UserPatch},
    startup::ApplicationState,
};

#[tracing::instrument(
    name = "Fetching own profile",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn me(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let profile = get_user(&mut connection, user.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(UserResponse::new(&profile, false)))
}

/// Users may edit their own names and contact details but never their role.
#[tracing::instrument(
    name = "Updating own profile",
    skip(app_state, user, patch),
    fields(user_id = user.id)
)]
pub async fn update_me(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>, ApiError> {
    let changeset = UserChangeset::from(UserUpdate::parse(patch, false)?);
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let profile = update_user(&mut connection, user.id, &changeset)
        .await
        .map_err(ApiError::from_database)?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(UserResponse::new(&profile, false)))
}
