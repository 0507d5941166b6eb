use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    database::{
        get_connection,
        queries::{delete_user, update_user},
    },
    domain::UserUpdate,
    models::UserChangeset,
    responses::AdminUserResponse,
    routes::{ApiError, UserPatch},
    startup::ApplicationState,
};

#[tracing::instrument(name = "Admin updating a user", skip(app_state, patch))]
pub async fn admin_update_user(
    State(app_state): State<ApplicationState>,
    Path(user_id): Path<i32>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<AdminUserResponse>, ApiError> {
    let changeset = UserChangeset::from(UserUpdate::parse(patch, true)?);
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let user = update_user(&mut connection, user_id, &changeset)
        .await
        .map_err(ApiError::from_database)?
        .ok_or_else(|| ApiError::not_found("User", user_id))?;
    Ok(Json(AdminUserResponse::from(&user)))
}

#[tracing::instrument(name = "Admin deleting a user", skip(app_state))]
pub async fn admin_delete_user(
    State(app_state): State<ApplicationState>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    if !delete_user(&mut connection, user_id).await? {
        return Err(ApiError::not_found("User", user_id));
    }
    tracing::info!(user_id, "User deleted.");
    Ok(StatusCode::NO_CONTENT)
}
