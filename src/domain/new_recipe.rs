use std::collections::HashSet;

use crate::routes::RecipeBody;

use super::{required_text, InvalidField, RecipeImage};

/// Upper bound shared by amounts and cooking times.
const MAX_SMALL_POSITIVE: i64 = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// A recipe payload that passed every field and cross-field check.
/// Whether the referenced ingredients and tags exist is checked against the
/// database when the recipe is stored.
#[derive(Debug)]
pub struct NewRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<i32>,
    pub image: Option<RecipeImage>,
}

impl TryFrom<RecipeBody> for NewRecipe {
    type Error = InvalidField;

    fn try_from(body: RecipeBody) -> Result<Self, Self::Error> {
        let ingredients = parse_ingredients(&body)?;
        let tags = parse_tags(&body.tags)?;
        let name = required_text("name", body.name, 200)?;
        let text = required_text("text", body.text, 10_000)?;
        if !(1..=MAX_SMALL_POSITIVE).contains(&body.cooking_time) {
            return Err(InvalidField::new(
                "cooking_time",
                "Cooking time must be at least 1 minute.",
            ));
        }
        let image = body
            .image
            .map(RecipeImage::try_from)
            .transpose()
            .map_err(|e| InvalidField::new("image", e))?;
        Ok(Self {
            name,
            text,
            cooking_time: body.cooking_time as i32,
            ingredients,
            tags,
            image,
        })
    }
}

fn parse_ingredients(
    body: &RecipeBody,
) -> Result<Vec<IngredientAmount>, InvalidField> {
    if body.ingredients.is_empty() {
        return Err(InvalidField::new(
            "ingredients",
            "A recipe needs at least one ingredient.",
        ));
    }
    let mut seen = HashSet::new();
    let mut ingredients = Vec::with_capacity(body.ingredients.len());
    for item in &body.ingredients {
        if item.amount < 1 {
            return Err(InvalidField::new(
                "amount",
                "Amount cannot be less than 1.",
            ));
        }
        if item.amount > MAX_SMALL_POSITIVE {
            return Err(InvalidField::new(
                "amount",
                format!("Amount cannot exceed {MAX_SMALL_POSITIVE}."),
            ));
        }
        if !seen.insert(item.id) {
            return Err(InvalidField::new(
                "ingredient",
                "Ingredients cannot be repeated.",
            ));
        }
        ingredients.push(IngredientAmount {
            ingredient_id: item.id,
            amount: item.amount as i32,
        });
    }
    Ok(ingredients)
}

fn parse_tags(tags: &[i32]) -> Result<Vec<i32>, InvalidField> {
    if tags.is_empty() {
        return Err(InvalidField::new(
            "tags",
            "A recipe needs at least one tag.",
        ));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = tags.iter().find(|tag| !seen.insert(**tag)) {
        return Err(InvalidField::new(
            "tags",
            format!("Tag {duplicate} is repeated."),
        ));
    }
    Ok(tags.to_vec())
}
