use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{Role, UserUpdate};
use crate::schema::{
    auth_tokens, favorites, ingredients, recipe_ingredients, recipe_tags,
    recipes, shopping_carts, subscriptions, tags, users,
};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Unknown role strings degrade to the unprivileged role.
    pub fn role(&self) -> Role {
        Role::try_from(self.role.as_str()).unwrap_or(Role::User)
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUserEntry<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
    }
}

impl From<UserUpdate> for UserChangeset {
    fn from(update: UserUpdate) -> Self {
        Self {
            username: update.username.map(|name| name.as_ref().to_string()),
            email: update.email.map(|email| email.as_ref().to_string()),
            first_name: update.first_name,
            last_name: update.last_name,
            role: update.role.map(|role| role.as_str().to_string()),
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuthTokenEntry {
    pub key: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl AuthTokenEntry {
    pub fn new(key: &str, user_id: i32) -> Self {
        Self {
            key: key.to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntry {
    pub user_id: i32,
    pub author_id: i32,
}

#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq,
)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Insertable)]
#[diesel(table_name = tags)]
pub struct NewTagEntry<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub slug: &'a str,
}

#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq,
)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Insertable)]
#[diesel(table_name = ingredients)]
pub struct NewIngredientEntry<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipeEntry<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// `image` is left untouched when `None`.
#[derive(AsChangeset)]
#[diesel(table_name = recipes)]
pub struct RecipeChangeset<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: Option<&'a str>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(table_name = recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeIngredient {
    pub id: i32,
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub struct RecipeIngredientEntry {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Tag))]
#[diesel(table_name = recipe_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeTag {
    pub id: i32,
    pub recipe_id: i32,
    pub tag_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = recipe_tags)]
pub struct RecipeTagEntry {
    pub recipe_id: i32,
    pub tag_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = favorites)]
pub struct FavoriteEntry {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = shopping_carts)]
pub struct ShoppingCartEntry {
    pub user_id: i32,
    pub recipe_id: i32,
}
