use anyhow::Context;
use axum::{extract::State, http::StatusCode, Extension, Json};
use secrecy::Secret;
use tracing::instrument;

use crate::{
    authentication::{issue_token, validate_credentials, AuthError, Credentials},
    database::{get_connection, queries::delete_token},
    domain::AuthToken,
    responses::TokenResponse,
    startup::ApplicationState,
};

use super::ApiError;

#[derive(serde::Deserialize)]
pub struct LoginData {
    email: String,
    password: Secret<String>,
}

#[instrument(
    name = "Token login",
    skip(app_state, data),
    fields(email = %data.email, user_id = tracing::field::Empty)
)]
pub async fn login(
    State(app_state): State<ApplicationState>,
    Json(data): Json<LoginData>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let credentials = Credentials {
        email: data.email,
        password: data.password,
    };
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let user_id = validate_credentials(credentials, &mut connection)
        .await
        .map_err(|e| match e {
            AuthError::UnknownEmail => {
                ApiError::NotFound("No user is registered with this email.".into())
            }
            AuthError::InvalidCredentials(_) => {
                ApiError::BadRequest("Invalid password.".into())
            }
            AuthError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        })?;
    tracing::Span::current().record("user_id", &tracing::field::display(user_id));
    let token = issue_token(user_id, &mut connection).await?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            auth_token: token.as_ref().to_string(),
        }),
    ))
}

/// Revokes the token the request was authenticated with.
#[instrument(name = "Token logout", skip(app_state, token))]
pub async fn logout(
    State(app_state): State<ApplicationState>,
    Extension(token): Extension<AuthToken>,
) -> Result<StatusCode, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    delete_token(&mut connection, &token)
        .await
        .context("Failed to delete auth token.")?;
    Ok(StatusCode::NO_CONTENT)
}
