use crate::routes::IngredientBody;

use super::{required_text, InvalidField};

pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl TryFrom<IngredientBody> for NewIngredient {
    type Error = InvalidField;
    fn try_from(body: IngredientBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text("name", body.name, 200)?,
            measurement_unit: required_text(
                "measurement_unit",
                body.measurement_unit,
                200,
            )?,
        })
    }
}
