use crate::database::DatabaseConnection;
use crate::domain::ShoppingListItem;
use crate::schema::{ingredients, recipe_ingredients, shopping_carts};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Sums ingredient amounts over every recipe in the user's cart, one item
/// per (name, unit) pair, ordered by name.
#[tracing::instrument(name = "Aggregate shopping cart", skip(connection))]
pub async fn get_shopping_list_items(
    connection: &mut DatabaseConnection,
    user_id: i32,
) -> Result<Vec<ShoppingListItem>, diesel::result::Error> {
    let cart_recipes = shopping_carts::table
        .filter(shopping_carts::user_id.eq(user_id))
        .select(shopping_carts::recipe_id);
    let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(cart_recipes))
        .group_by((ingredients::name, ingredients::measurement_unit))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            sum(recipe_ingredients::amount),
        ))
        .order((ingredients::name, ingredients::measurement_unit))
        .load(connection)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(name, measurement_unit, amount)| ShoppingListItem {
            name,
            measurement_unit,
            amount: amount.unwrap_or_default(),
        })
        .collect())
}
