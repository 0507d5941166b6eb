mod download;
mod lists;
mod listing;
mod manage;

pub use download::*;
pub use lists::*;
pub use listing::*;
pub use manage::*;

use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Debug)]
pub struct IngredientAmountBody {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub amount: i64,
}

/// Body of recipe creation and update. `image` is a base64 data URI and may
/// be omitted on update.
#[derive(serde::Deserialize, Debug)]
pub struct RecipeBody {
    pub ingredients: Vec<IngredientAmountBody>,
    pub tags: Vec<i32>,
    #[serde(default)]
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub cooking_time: i64,
}
