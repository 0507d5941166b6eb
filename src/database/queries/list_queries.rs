use std::collections::HashSet;

use crate::database::DatabaseConnection;
use crate::models::{FavoriteEntry, ShoppingCartEntry};
use crate::schema::{favorites, shopping_carts};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// The per-user recipe collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl std::fmt::Display for RecipeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeList::Favorites => f.write_str("favorites"),
            RecipeList::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}

/// Returns `false` when the recipe was already in the list.
#[tracing::instrument(name = "Add recipe to list", skip(connection))]
pub async fn add_recipe_to_list(
    connection: &mut DatabaseConnection,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<bool, diesel::result::Error> {
    let inserted = match list {
        RecipeList::Favorites => {
            diesel::insert_into(favorites::table)
                .values(&FavoriteEntry { user_id, recipe_id })
                .on_conflict_do_nothing()
                .execute(connection)
                .await?
        }
        RecipeList::ShoppingCart => {
            diesel::insert_into(shopping_carts::table)
                .values(&ShoppingCartEntry { user_id, recipe_id })
                .on_conflict_do_nothing()
                .execute(connection)
                .await?
        }
    };
    Ok(inserted > 0)
}

/// Returns `false` when the recipe was not in the list.
#[tracing::instrument(name = "Remove recipe from list", skip(connection))]
pub async fn remove_recipe_from_list(
    connection: &mut DatabaseConnection,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<bool, diesel::result::Error> {
    let deleted = match list {
        RecipeList::Favorites => {
            diesel::delete(
                favorites::table
                    .filter(favorites::user_id.eq(user_id))
                    .filter(favorites::recipe_id.eq(recipe_id)),
            )
            .execute(connection)
            .await?
        }
        RecipeList::ShoppingCart => {
            diesel::delete(
                shopping_carts::table
                    .filter(shopping_carts::user_id.eq(user_id))
                    .filter(shopping_carts::recipe_id.eq(recipe_id)),
            )
            .execute(connection)
            .await?
        }
    };
    Ok(deleted > 0)
}

/// Which of `recipe_ids` are in the user's list.
#[tracing::instrument(name = "Get listed recipes", skip(connection, recipe_ids))]
pub async fn listed_recipe_ids(
    connection: &mut DatabaseConnection,
    list: RecipeList,
    user_id: i32,
    recipe_ids: &[i32],
) -> Result<HashSet<i32>, diesel::result::Error> {
    let ids: Vec<i32> = match list {
        RecipeList::Favorites => {
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq_any(recipe_ids))
                .select(favorites::recipe_id)
                .load(connection)
                .await?
        }
        RecipeList::ShoppingCart => {
            shopping_carts::table
                .filter(shopping_carts::user_id.eq(user_id))
                .filter(shopping_carts::recipe_id.eq_any(recipe_ids))
                .select(shopping_carts::recipe_id)
                .load(connection)
                .await?
        }
    };
    Ok(ids.into_iter().collect())
}
