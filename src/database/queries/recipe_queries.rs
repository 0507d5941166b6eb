use std::collections::{HashMap, HashSet};

use crate::database::DatabaseConnection;
use crate::domain::NewRecipe;
use crate::models::{
    Ingredient, NewRecipeEntry, Recipe, RecipeChangeset, RecipeIngredient,
    RecipeIngredientEntry, RecipeTag, RecipeTagEntry, Tag, User,
};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes,
    shopping_carts, tags,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{get_users, listed_recipe_ids, subscribed_author_ids, RecipeList};

/// Narrowing applied to the recipe listing. Empty/`None` fields do not
/// filter.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    /// Recipes carrying any of these tag slugs.
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub favorited_by: Option<i32>,
    pub in_cart_of: Option<i32>,
}

/// A recipe with everything its full representation needs.
#[derive(Debug)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub author_is_subscribed: bool,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<(RecipeIngredient, Ingredient)>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// The first id in `ids` with no ingredient row.
#[tracing::instrument(name = "Check ingredients exist", skip(connection))]
pub async fn find_missing_ingredient(
    connection: &mut DatabaseConnection,
    ids: &[i32],
) -> Result<Option<i32>, diesel::result::Error> {
    let existing: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(ids))
        .select(ingredients::id)
        .load::<i32>(connection)
        .await?
        .into_iter()
        .collect();
    Ok(ids.iter().copied().find(|id| !existing.contains(id)))
}

/// The first id in `ids` with no tag row.
#[tracing::instrument(name = "Check tags exist", skip(connection))]
pub async fn find_missing_tag(
    connection: &mut DatabaseConnection,
    ids: &[i32],
) -> Result<Option<i32>, diesel::result::Error> {
    let existing: HashSet<i32> = tags::table
        .filter(tags::id.eq_any(ids))
        .select(tags::id)
        .load::<i32>(connection)
        .await?
        .into_iter()
        .collect();
    Ok(ids.iter().copied().find(|id| !existing.contains(id)))
}

async fn insert_recipe_links(
    connection: &mut DatabaseConnection,
    recipe_id: i32,
    recipe: &NewRecipe,
) -> Result<(), diesel::result::Error> {
    let ingredient_links: Vec<RecipeIngredientEntry> = recipe
        .ingredients
        .iter()
        .map(|item| RecipeIngredientEntry {
            recipe_id,
            ingredient_id: item.ingredient_id,
            amount: item.amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&ingredient_links)
        .execute(connection)
        .await?;
    let tag_links: Vec<RecipeTagEntry> = recipe
        .tags
        .iter()
        .map(|&tag_id| RecipeTagEntry { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_links)
        .execute(connection)
        .await?;
    Ok(())
}

/// Stores the recipe row and its ingredient and tag links. Callers run this
/// inside a transaction.
#[tracing::instrument(
    name = "Inserting recipe into database.",
    skip(connection, recipe, image_path),
    fields(recipe_name = %recipe.name)
)]
pub async fn insert_recipe(
    connection: &mut DatabaseConnection,
    author_id: i32,
    recipe: &NewRecipe,
    image_path: &str,
) -> Result<Recipe, diesel::result::Error> {
    let stored = diesel::insert_into(recipes::table)
        .values(&NewRecipeEntry {
            author_id,
            name: &recipe.name,
            text: &recipe.text,
            image: image_path,
            cooking_time: recipe.cooking_time,
            pub_date: Utc::now(),
        })
        .returning(Recipe::as_returning())
        .get_result(connection)
        .await?;
    insert_recipe_links(connection, stored.id, recipe).await?;
    tracing::info!(recipe_id = stored.id, "New recipe has been saved.");
    Ok(stored)
}

/// Replaces every ingredient and tag link, then overwrites the scalar
/// fields. Callers run this inside a transaction.
#[tracing::instrument(
    name = "Updating recipe in database.",
    skip(connection, recipe, image_path)
)]
pub async fn update_recipe(
    connection: &mut DatabaseConnection,
    recipe_id: i32,
    recipe: &NewRecipe,
    image_path: Option<&str>,
) -> Result<Recipe, diesel::result::Error> {
    diesel::delete(
        recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)),
    )
    .execute(connection)
    .await?;
    diesel::delete(
        recipe_ingredients::table
            .filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(connection)
    .await?;
    insert_recipe_links(connection, recipe_id, recipe).await?;
    diesel::update(recipes::table.find(recipe_id))
        .set(&RecipeChangeset {
            name: &recipe.name,
            text: &recipe.text,
            cooking_time: recipe.cooking_time,
            image: image_path,
        })
        .returning(Recipe::as_returning())
        .get_result(connection)
        .await
}

#[tracing::instrument(name = "Get recipe", skip(connection))]
pub async fn get_recipe(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<Option<Recipe>, diesel::result::Error> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Delete recipe", skip(connection))]
pub async fn delete_recipe(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<bool, diesel::result::Error> {
    let deleted = diesel::delete(recipes::table.find(id))
        .execute(connection)
        .await?;
    Ok(deleted > 0)
}

fn filtered_recipes(
    filter: &RecipeFilter,
) -> recipes::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = recipes::table.into_boxed();
    if !filter.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filter.tags.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author));
    }
    if let Some(user) = filter.favorited_by {
        let favorited = favorites::table
            .filter(favorites::user_id.eq(user))
            .select(favorites::recipe_id);
        query = query.filter(recipes::id.eq_any(favorited));
    }
    if let Some(user) = filter.in_cart_of {
        let in_cart = shopping_carts::table
            .filter(shopping_carts::user_id.eq(user))
            .select(shopping_carts::recipe_id);
        query = query.filter(recipes::id.eq_any(in_cart));
    }
    query
}

/// One page of recipes, newest first, plus the total number of matches.
#[tracing::instrument(name = "List recipes", skip(connection))]
pub async fn list_recipes(
    connection: &mut DatabaseConnection,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Recipe>, i64), diesel::result::Error> {
    let count = filtered_recipes(filter)
        .count()
        .get_result(connection)
        .await?;
    let page = filtered_recipes(filter)
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .limit(limit)
        .offset(offset)
        .select(Recipe::as_select())
        .load(connection)
        .await?;
    Ok((page, count))
}

/// All recipes of the given authors, newest first.
#[tracing::instrument(name = "Get recipes by authors", skip(connection))]
pub async fn recipes_by_authors(
    connection: &mut DatabaseConnection,
    author_ids: &[i32],
) -> Result<Vec<Recipe>, diesel::result::Error> {
    recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .select(Recipe::as_select())
        .load(connection)
        .await
}

/// Batch-loads tags, ingredients, authors and the viewer's flags for
/// `recipes`, preserving their order.
#[tracing::instrument(
    name = "Load recipe details",
    skip(connection, recipes),
    fields(recipe_count = recipes.len())
)]
pub async fn load_recipe_details(
    connection: &mut DatabaseConnection,
    recipes: Vec<Recipe>,
    viewer_id: Option<i32>,
) -> Result<Vec<RecipeDetails>, diesel::result::Error> {
    let tags_per_recipe = RecipeTag::belonging_to(&recipes)
        .inner_join(tags::table)
        .order(tags::id)
        .select((RecipeTag::as_select(), Tag::as_select()))
        .load::<(RecipeTag, Tag)>(connection)
        .await?
        .grouped_by(&recipes);
    let ingredients_per_recipe = RecipeIngredient::belonging_to(&recipes)
        .inner_join(ingredients::table)
        .order(recipe_ingredients::id)
        .select((RecipeIngredient::as_select(), Ingredient::as_select()))
        .load::<(RecipeIngredient, Ingredient)>(connection)
        .await?
        .grouped_by(&recipes);

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors: HashMap<i32, User> = get_users(connection, &author_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let (favorited, in_cart, subscribed) = match viewer_id {
        Some(viewer) => (
            listed_recipe_ids(connection, RecipeList::Favorites, viewer, &recipe_ids)
                .await?,
            listed_recipe_ids(connection, RecipeList::ShoppingCart, viewer, &recipe_ids)
                .await?,
            subscribed_author_ids(connection, viewer, &author_ids).await?,
        ),
        None => Default::default(),
    };

    recipes
        .into_iter()
        .zip(tags_per_recipe)
        .zip(ingredients_per_recipe)
        .map(|((recipe, tags), ingredients)| {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or(diesel::result::Error::NotFound)?;
            Ok(RecipeDetails {
                author_is_subscribed: subscribed.contains(&author.id),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                tags: tags.into_iter().map(|(_, tag)| tag).collect(),
                ingredients,
                author,
                recipe,
            })
        })
        .collect()
}
