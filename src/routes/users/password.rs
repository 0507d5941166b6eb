use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use secrecy::{ExposeSecret, Secret};

use crate::{
    authentication::{change_password, verify_current_password, AuthError, CurrentUser},
    database::get_connection,
    domain::Password,
    routes::ApiError,
    startup::ApplicationState,
};

#[derive(serde::Deserialize)]
pub struct PasswordChange {
    current_password: Secret<String>,
    new_password: Secret<String>,
}

#[tracing::instrument(
    name = "Changing password",
    skip(app_state, user, data),
    fields(user_id = user.id)
)]
pub async fn set_password(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Json(data): Json<PasswordChange>,
) -> Result<StatusCode, ApiError> {
    let new_password = Password::try_from(data.new_password.expose_secret().to_string())
        .map_err(|e| ApiError::field("new_password", e))?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    verify_current_password(user.id, data.current_password, &mut connection)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(_) | AuthError::UnknownEmail => {
                ApiError::field("current_password", "The current password is incorrect.")
            }
            AuthError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        })?;
    change_password(user.id, new_password, &mut connection).await?;
    tracing::info!("Password changed.");
    Ok(StatusCode::NO_CONTENT)
}
