use anyhow::Context;
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use crate::{
    authentication::CurrentUser,
    database::{get_connection, queries::get_shopping_list_items},
    domain::{render_shopping_list, SHOPPING_LIST_FILENAME},
    routes::ApiError,
    startup::ApplicationState,
};

#[tracing::instrument(
    name = "Downloading shopping list",
    skip(app_state, user),
    fields(user_id = user.id)
)]
pub async fn download_shopping_cart(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let items = get_shopping_list_items(&mut connection, user.id).await?;
    let body = render_shopping_list(&items);
    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
            ),
        ],
        body,
    ))
}
