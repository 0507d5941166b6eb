use crate::database::DatabaseConnection;
use crate::domain::AuthToken;
use crate::models::{AuthTokenEntry, User};
use crate::schema::{auth_tokens, users};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

#[tracing::instrument(
    name = "Storing auth token into database",
    skip(token, connection)
)]
pub async fn store_token(
    connection: &mut DatabaseConnection,
    token: &AuthToken,
    user_id: i32,
) -> Result<(), StoreTokenError> {
    let entry = AuthTokenEntry::new(token.as_ref(), user_id);
    diesel::insert_into(auth_tokens::table)
        .values(&entry)
        .execute(connection)
        .await?;
    tracing::info!("New auth token has been saved");
    Ok(())
}

#[tracing::instrument(name = "Getting the user for a token", skip_all)]
pub async fn get_user_for_token(
    connection: &mut DatabaseConnection,
    token: &AuthToken,
) -> Result<Option<User>, diesel::result::Error> {
    auth_tokens::table
        .inner_join(users::table)
        .filter(auth_tokens::key.eq(token.as_ref()))
        .select(User::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Deleting auth token", skip_all)]
pub async fn delete_token(
    connection: &mut DatabaseConnection,
    token: &AuthToken,
) -> Result<(), diesel::result::Error> {
    diesel::delete(auth_tokens::table.find(token.as_ref()))
        .execute(connection)
        .await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
#[error("A database error has ocurred when storing an auth token")]
pub struct StoreTokenError(#[from] diesel::result::Error);
