mod middleware;

pub use middleware::*;

use anyhow::Context;
use argon2::{
    password_hash::SaltString, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier,
};
use secrecy::{ExposeSecret, Secret};

use crate::{
    database::{
        queries::{
            change_password_query, get_password_hash, get_stored_credentials,
            store_token,
        },
        DatabaseConnection,
    },
    domain::{AuthToken, Password},
    telemetry::spawn_blocking_with_tracing,
};

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("No user is registered with this email.")]
    UnknownEmail,
    #[error("Invalid password.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

#[tracing::instrument(
    name = "Validate Credentials",
    skip(connection, credentials)
)]
pub async fn validate_credentials(
    credentials: Credentials,
    connection: &mut DatabaseConnection,
) -> Result<i32, AuthError> {
    let (user_id, expected_hash) =
        get_stored_credentials(&credentials.email, connection)
            .await
            .context("Failed to retrieve stored credentials.")?
            .ok_or(AuthError::UnknownEmail)?;

    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_hash, credentials.password)
    })
    .await
    .context("Failed to spawn blocking task.")??;

    Ok(user_id)
}

/// Checks `candidate` against the stored hash of an existing user.
#[tracing::instrument(name = "Verify current password", skip(connection, candidate))]
pub async fn verify_current_password(
    user_id: i32,
    candidate: Secret<String>,
    connection: &mut DatabaseConnection,
) -> Result<(), AuthError> {
    let expected_hash = get_password_hash(connection, user_id)
        .await
        .context("Failed to retrieve stored password hash.")?;
    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_hash, candidate)
    })
    .await
    .context("Failed to spawn blocking task.")?
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_hash =
        PasswordHash::new(expected_password_hash.expose_secret())
            .context("Failed to parse hash in PHC format.")
            .map_err(AuthError::UnexpectedError)?;
    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)?;
    Ok(())
}

/// Mints a fresh token for `user_id` and stores it.
#[tracing::instrument(name = "Issue auth token", skip(connection))]
pub async fn issue_token(
    user_id: i32,
    connection: &mut DatabaseConnection,
) -> Result<AuthToken, anyhow::Error> {
    let token = AuthToken::generate();
    store_token(connection, &token, user_id)
        .await
        .context("Failed to store auth token.")?;
    Ok(token)
}

#[tracing::instrument(name = "Change password", skip(password, connection))]
pub async fn change_password(
    user_id: i32,
    password: Password,
    connection: &mut DatabaseConnection,
) -> Result<(), anyhow::Error> {
    let password_hash = hash_password(password).await?;
    change_password_query(connection, user_id, password_hash)
        .await
        .context("Failed to change password in the database.")?;
    Ok(())
}

/// Hashes on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password(
    password: Password,
) -> Result<Secret<String>, anyhow::Error> {
    spawn_blocking_with_tracing(move || compute_password_hash(&password))
        .await?
        .context("Failed to hash password.")
}

fn compute_password_hash(
    password: &Password,
) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {e}"))?;
    let password_hash =
        Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
            .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?
            .to_string();
    Ok(Secret::new(password_hash))
}
