//! Wire representations. Every body the API returns is built here from
//! database rows by an explicit mapping function.
use serde::Serialize;

use crate::{
    database::queries::RecipeDetails,
    media::MediaStorage,
    models::{Ingredient, Recipe, RecipeIngredient, Tag, User},
};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn new(user: &User, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

/// Registration echo; never carries the password.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for CreatedUserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    #[serde(flatten)]
    pub user: CreatedUserResponse,
    pub role: String,
}

impl From<&User> for AdminUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user: CreatedUserResponse::from(user),
            role: user.role().to_string(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// An ingredient as used by one recipe: `id` is the ingredient's id.
#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<(RecipeIngredient, Ingredient)> for RecipeIngredientResponse {
    fn from((link, ingredient): (RecipeIngredient, Ingredient)) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
            amount: link.amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub image: String,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub cooking_time: i32,
}

impl RecipeResponse {
    pub fn from_details(details: RecipeDetails, media: &MediaStorage) -> Self {
        Self {
            id: details.recipe.id,
            tags: details.tags.into_iter().map(TagResponse::from).collect(),
            author: UserResponse::new(&details.author, details.author_is_subscribed),
            image: media.url_for(&details.recipe.image),
            name: details.recipe.name,
            text: details.recipe.text,
            ingredients: details
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: details.is_favorited,
            is_in_shopping_cart: details.is_in_shopping_cart,
            cooking_time: details.recipe.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl ShortRecipeResponse {
    pub fn new(recipe: &Recipe, media: &MediaStorage) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: media.url_for(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// An author as seen from the subscriber's side.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: usize,
}

impl SubscriptionResponse {
    /// `recipes` must be the author's recipes, newest first; only the first
    /// `recipes_limit` are listed but all of them are counted.
    pub fn new(
        author: &User,
        recipes: &[Recipe],
        recipes_limit: Option<usize>,
        media: &MediaStorage,
    ) -> Self {
        let shown = recipes_limit.unwrap_or(recipes.len());
        Self {
            author: UserResponse::new(author, true),
            recipes: recipes
                .iter()
                .take(shown)
                .map(|recipe| ShortRecipeResponse::new(recipe, media))
                .collect(),
            recipes_count: recipes.len(),
        }
    }
}
