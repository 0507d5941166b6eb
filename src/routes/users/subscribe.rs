use std::collections::HashMap;

use anyhow::Context;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    authentication::CurrentUser,
    database::{
        get_connection,
        queries::{
            delete_subscription, get_user, insert_subscription,
            list_subscribed_authors, recipes_by_authors,
        },
    },
    models::Recipe,
    pagination::{LimitOffset, Paginated},
    responses::SubscriptionResponse,
    routes::ApiError,
    startup::ApplicationState,
};

#[derive(serde::Deserialize, Debug, Default)]
pub struct RecipesLimit {
    pub recipes_limit: Option<usize>,
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct SubscriptionListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub recipes_limit: Option<usize>,
}

#[tracing::instrument(
    name = "Subscribing to an author",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn subscribe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<i32>,
    Query(query): Query<RecipesLimit>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let author = get_user(&mut connection, author_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", author_id))?;
    if author.id == user.id {
        return Err(ApiError::BadRequest(
            "You cannot subscribe to yourself.".into(),
        ));
    }
    if !insert_subscription(&mut connection, user.id, author.id).await? {
        return Err(ApiError::BadRequest(
            "You are already subscribed to this author.".into(),
        ));
    }
    let recipes = recipes_by_authors(&mut connection, &[author.id]).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(
            &author,
            &recipes,
            query.recipes_limit,
            &app_state.media,
        )),
    ))
}

#[tracing::instrument(
    name = "Unsubscribing from an author",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn unsubscribe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    get_user(&mut connection, author_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", author_id))?;
    if !delete_subscription(&mut connection, user.id, author_id).await? {
        return Err(ApiError::BadRequest(
            "You are not subscribed to this author.".into(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(
    name = "Listing subscriptions",
    skip(app_state, user, uri),
    fields(user_id = user.id)
)]
pub async fn subscriptions(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<Paginated<SubscriptionResponse>>, ApiError> {
    let window = LimitOffset {
        limit: query.limit,
        offset: query.offset,
    }
    .window(app_state.page_size);
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let (authors, count) =
        list_subscribed_authors(&mut connection, user.id, window.limit, window.offset)
            .await?;
    let author_ids: Vec<i32> = authors.iter().map(|author| author.id).collect();
    let mut recipes_per_author: HashMap<i32, Vec<Recipe>> = HashMap::new();
    for recipe in recipes_by_authors(&mut connection, &author_ids).await? {
        recipes_per_author
            .entry(recipe.author_id)
            .or_default()
            .push(recipe);
    }
    let results = authors
        .iter()
        .map(|author| {
            SubscriptionResponse::new(
                author,
                recipes_per_author
                    .get(&author.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                query.recipes_limit,
                &app_state.media,
            )
        })
        .collect();
    Ok(Json(Paginated::by_limit_offset(
        results,
        count,
        window,
        &app_state.base_url,
        &uri,
    )))
}
