use anyhow::Context;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    Json,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection};

use crate::{
    authentication::{hash_password, RequestContext},
    database::{
        get_connection,
        queries::{get_user, insert_user, list_users, subscribed_author_ids},
    },
    domain::NewUser,
    pagination::{LimitOffset, Paginated},
    responses::{CreatedUserResponse, UserResponse},
    routes::{ApiError, UserRegistration},
    startup::ApplicationState,
};

#[tracing::instrument(
    name = "Registering a new user",
    skip(app_state, registration),
    fields(username = %registration.username, email = %registration.email)
)]
pub async fn register(
    State(app_state): State<ApplicationState>,
    Json(registration): Json<UserRegistration>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let new_user = NewUser::try_from(registration)?;
    let password_hash = hash_password(new_user.password.clone()).await?;
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let user = connection
        .transaction::<_, ApiError, _>(|conn| {
            async move {
                insert_user(conn, &new_user, &password_hash)
                    .await
                    .map_err(ApiError::from_database)
            }
            .scope_boxed()
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedUserResponse::from(&user))))
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[tracing::instrument(name = "Listing users", skip(app_state, context, uri))]
pub async fn get_users(
    State(app_state): State<ApplicationState>,
    context: RequestContext,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let window = LimitOffset {
        limit: query.limit,
        offset: query.offset,
    }
    .window(app_state.page_size);
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let (users, count) = list_users(
        &mut connection,
        query.search.as_deref(),
        window.limit,
        window.offset,
    )
    .await?;
    let subscribed = match context.viewer_id() {
        Some(viewer) => {
            let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
            subscribed_author_ids(&mut connection, viewer, &ids).await?
        }
        None => Default::default(),
    };
    let results = users
        .iter()
        .map(|user| UserResponse::new(user, subscribed.contains(&user.id)))
        .collect();
    Ok(Json(Paginated::by_limit_offset(
        results,
        count,
        window,
        &app_state.base_url,
        &uri,
    )))
}

#[tracing::instrument(name = "Fetching a user", skip(app_state, context))]
pub async fn get_user_by_id(
    State(app_state): State<ApplicationState>,
    context: RequestContext,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let user = get_user(&mut connection, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", user_id))?;
    let is_subscribed = match context.viewer_id() {
        Some(viewer) => subscribed_author_ids(&mut connection, viewer, &[user.id])
            .await?
            .contains(&user.id),
        None => false,
    };
    Ok(Json(UserResponse::new(&user, is_subscribed)))
}
