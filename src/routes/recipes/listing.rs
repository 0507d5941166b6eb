use anyhow::Context;
use axum::extract::{OriginalUri, State};
use axum::Json;
use axum_extra::extract::Query;

use crate::{
    authentication::RequestContext,
    database::{
        get_connection,
        queries::{list_recipes, load_recipe_details, RecipeFilter},
    },
    pagination::{PageNumber, Paginated},
    responses::RecipeResponse,
    routes::ApiError,
    startup::ApplicationState,
};

/// `tags` may repeat; the boolean flags accept `1` or `true`.
#[derive(serde::Deserialize, Debug, Default)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn is_set(flag: &Option<String>) -> bool {
    matches!(flag.as_deref(), Some("1" | "true" | "True"))
}

impl RecipeListQuery {
    /// `None` when a per-user flag is set on an anonymous request; such a
    /// listing is empty.
    fn filter(&self, viewer_id: Option<i32>) -> Option<RecipeFilter> {
        let mut filter = RecipeFilter {
            tags: self.tags.clone(),
            author: self.author,
            ..Default::default()
        };
        if is_set(&self.is_favorited) {
            filter.favorited_by = Some(viewer_id?);
        }
        if is_set(&self.is_in_shopping_cart) {
            filter.in_cart_of = Some(viewer_id?);
        }
        Some(filter)
    }
}

#[tracing::instrument(name = "Listing recipes", skip(app_state, context, uri))]
pub async fn get_recipes(
    State(app_state): State<ApplicationState>,
    context: RequestContext,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Paginated<RecipeResponse>>, ApiError> {
    let window = PageNumber {
        page: query.page,
        limit: query.limit,
    }
    .window(app_state.page_size);
    let viewer_id = context.viewer_id();
    let Some(filter) = query.filter(viewer_id) else {
        return Ok(Json(Paginated::by_page_number(
            Vec::new(),
            0,
            window,
            &app_state.base_url,
            &uri,
        )));
    };
    let mut connection = get_connection(&app_state.database_pool)
        .await
        .context("Could not get connection from pool.")?;
    let (recipes, count) =
        list_recipes(&mut connection, &filter, window.limit, window.offset).await?;
    let results = load_recipe_details(&mut connection, recipes, viewer_id)
        .await?
        .into_iter()
        .map(|details| RecipeResponse::from_details(details, &app_state.media))
        .collect();
    Ok(Json(Paginated::by_page_number(
        results,
        count,
        window,
        &app_state.base_url,
        &uri,
    )))
}
