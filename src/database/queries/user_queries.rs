use crate::database::DatabaseConnection;
use crate::domain::{NewUser, Role};
use crate::models::{NewUserEntry, User, UserChangeset};
use crate::schema::users;
use diesel::prelude::*;
use diesel::PgTextExpressionMethods;
use diesel_async::RunQueryDsl;
use secrecy::{ExposeSecret, Secret};

use super::escape_like;

#[tracing::instrument(
    name = "Inserting user into database.",
    skip(connection, new_user, password_hash),
    fields(username = %new_user.username.as_ref())
)]
pub async fn insert_user(
    connection: &mut DatabaseConnection,
    new_user: &NewUser,
    password_hash: &Secret<String>,
) -> Result<User, diesel::result::Error> {
    let entry = NewUserEntry {
        username: new_user.username.as_ref(),
        email: new_user.email.as_ref(),
        first_name: &new_user.first_name,
        last_name: &new_user.last_name,
        password_hash: password_hash.expose_secret(),
        role: Role::User.as_str(),
    };
    let user = diesel::insert_into(users::table)
        .values(&entry)
        .returning(User::as_returning())
        .get_result(connection)
        .await?;
    tracing::info!(user_id = user.id, "New user has been saved.");
    Ok(user)
}

#[tracing::instrument(name = "Get user by id", skip(connection))]
pub async fn get_user(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Get users by id", skip(connection, ids))]
pub async fn get_users(
    connection: &mut DatabaseConnection,
    ids: &[i32],
) -> Result<Vec<User>, diesel::result::Error> {
    users::table
        .filter(users::id.eq_any(ids))
        .select(User::as_select())
        .load(connection)
        .await
}

#[tracing::instrument(
    name = "Retrieve stored credentials",
    skip(email, connection)
)]
pub async fn get_stored_credentials(
    email: &str,
    connection: &mut DatabaseConnection,
) -> Result<Option<(i32, Secret<String>)>, diesel::result::Error> {
    let row: Option<(i32, String)> = users::table
        .filter(users::email.eq(email))
        .select((users::id, users::password_hash))
        .first(connection)
        .await
        .optional()?;
    Ok(row.map(|(id, hash)| (id, Secret::new(hash))))
}

#[tracing::instrument(name = "Get password hash", skip(connection))]
pub async fn get_password_hash(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<Secret<String>, diesel::result::Error> {
    let hash: String = users::table
        .find(id)
        .select(users::password_hash)
        .first(connection)
        .await?;
    Ok(Secret::new(hash))
}

#[tracing::instrument(
    name = "Change password query",
    skip(connection, password_hash)
)]
pub async fn change_password_query(
    connection: &mut DatabaseConnection,
    id: i32,
    password_hash: Secret<String>,
) -> Result<(), diesel::result::Error> {
    diesel::update(users::table.find(id))
        .set(users::password_hash.eq(password_hash.expose_secret()))
        .execute(connection)
        .await?;
    Ok(())
}

fn users_matching(search: Option<&str>) -> users::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = users::table.into_boxed();
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        query = query
            .filter(users::username.ilike(format!("%{}%", escape_like(search))));
    }
    query
}

/// One page of users ordered by id, plus the total number of matches.
#[tracing::instrument(name = "List users", skip(connection))]
pub async fn list_users(
    connection: &mut DatabaseConnection,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<User>, i64), diesel::result::Error> {
    let count = users_matching(search).count().get_result(connection).await?;
    let page = users_matching(search)
        .order(users::id)
        .limit(limit)
        .offset(offset)
        .select(User::as_select())
        .load(connection)
        .await?;
    Ok((page, count))
}

#[tracing::instrument(name = "Update user", skip(connection))]
pub async fn update_user(
    connection: &mut DatabaseConnection,
    id: i32,
    changeset: &UserChangeset,
) -> Result<Option<User>, diesel::result::Error> {
    if changeset.is_empty() {
        return get_user(connection, id).await;
    }
    diesel::update(users::table.find(id))
        .set(changeset)
        .returning(User::as_returning())
        .get_result(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Delete user", skip(connection))]
pub async fn delete_user(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<bool, diesel::result::Error> {
    let deleted = diesel::delete(users::table.find(id))
        .execute(connection)
        .await?;
    Ok(deleted > 0)
}
