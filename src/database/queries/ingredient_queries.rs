use crate::database::DatabaseConnection;
use crate::domain::NewIngredient;
use crate::models::{Ingredient, NewIngredientEntry};
use crate::schema::ingredients;
use diesel::prelude::*;
use diesel::PgTextExpressionMethods;
use diesel_async::RunQueryDsl;

use super::escape_like;

/// Ingredients whose name starts with `name_prefix`, case-insensitively.
#[tracing::instrument(name = "List ingredients", skip(connection))]
pub async fn list_ingredients(
    connection: &mut DatabaseConnection,
    name_prefix: Option<&str>,
) -> Result<Vec<Ingredient>, diesel::result::Error> {
    let mut query = ingredients::table.into_boxed();
    if let Some(prefix) = name_prefix.filter(|p| !p.is_empty()) {
        query = query
            .filter(ingredients::name.ilike(format!("{}%", escape_like(prefix))));
    }
    query
        .order(ingredients::name)
        .select(Ingredient::as_select())
        .load(connection)
        .await
}

#[tracing::instrument(name = "Get ingredient", skip(connection))]
pub async fn get_ingredient(
    connection: &mut DatabaseConnection,
    id: i32,
) -> Result<Option<Ingredient>, diesel::result::Error> {
    ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Insert ingredient", skip(connection, ingredient))]
pub async fn insert_ingredient(
    connection: &mut DatabaseConnection,
    ingredient: &NewIngredient,
) -> Result<Ingredient, diesel::result::Error> {
    diesel::insert_into(ingredients::table)
        .values(&NewIngredientEntry {
            name: &ingredient.name,
            measurement_unit: &ingredient.measurement_unit,
        })
        .returning(Ingredient::as_returning())
        .get_result(connection)
        .await
}
