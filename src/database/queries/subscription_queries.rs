use std::collections::HashSet;

use crate::database::DatabaseConnection;
use crate::models::{SubscriptionEntry, User};
use crate::schema::{subscriptions, users};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Returns `false` when the subscription already existed.
#[tracing::instrument(name = "Insert subscription", skip(connection))]
pub async fn insert_subscription(
    connection: &mut DatabaseConnection,
    user_id: i32,
    author_id: i32,
) -> Result<bool, diesel::result::Error> {
    let inserted = diesel::insert_into(subscriptions::table)
        .values(&SubscriptionEntry { user_id, author_id })
        .on_conflict_do_nothing()
        .execute(connection)
        .await?;
    Ok(inserted > 0)
}

/// Returns `false` when there was no subscription to remove.
#[tracing::instrument(name = "Delete subscription", skip(connection))]
pub async fn delete_subscription(
    connection: &mut DatabaseConnection,
    user_id: i32,
    author_id: i32,
) -> Result<bool, diesel::result::Error> {
    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::author_id.eq(author_id)),
    )
    .execute(connection)
    .await?;
    Ok(deleted > 0)
}

/// Which of `author_ids` the viewer is subscribed to.
#[tracing::instrument(name = "Get subscribed authors", skip(connection, author_ids))]
pub async fn subscribed_author_ids(
    connection: &mut DatabaseConnection,
    viewer_id: i32,
    author_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    let ids: Vec<i32> = subscriptions::table
        .filter(subscriptions::user_id.eq(viewer_id))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load(connection)
        .await?;
    Ok(ids.into_iter().collect())
}

/// One page of the authors `user_id` follows, plus their total number.
#[tracing::instrument(name = "List subscriptions", skip(connection))]
pub async fn list_subscribed_authors(
    connection: &mut DatabaseConnection,
    user_id: i32,
    limit: i64,
    offset: i64,
) -> Result<(Vec<User>, i64), diesel::result::Error> {
    let followed = subscriptions::table
        .filter(subscriptions::user_id.eq(user_id))
        .select(subscriptions::author_id);
    let count = subscriptions::table
        .filter(subscriptions::user_id.eq(user_id))
        .count()
        .get_result(connection)
        .await?;
    let authors = users::table
        .filter(users::id.eq_any(followed))
        .order(users::id)
        .limit(limit)
        .offset(offset)
        .select(User::as_select())
        .load(connection)
        .await?;
    Ok((authors, count))
}
