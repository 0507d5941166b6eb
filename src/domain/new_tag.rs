use crate::routes::TagBody;

use super::{required_text, InvalidField};

#[derive(Debug)]
pub struct TagColor(String);

impl TryFrom<String> for TagColor {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let is_hex_color = value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit());
        if is_hex_color {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(format!("{value} is not a color in #rrggbb format."))
        }
    }
}

impl AsRef<str> for TagColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct TagSlug(String);

impl TryFrom<String> for TagSlug {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let is_slug = !value.is_empty()
            && value.len() <= 200
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if is_slug {
            Ok(Self(value))
        } else {
            Err(format!(
                "{value} is not a valid slug of letters, digits, hyphens or underscores."
            ))
        }
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub struct NewTag {
    pub name: String,
    pub color: TagColor,
    pub slug: TagSlug,
}

impl TryFrom<TagBody> for NewTag {
    type Error = InvalidField;
    fn try_from(body: TagBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text("name", body.name, 200)?,
            color: TagColor::try_from(body.color)
                .map_err(|e| InvalidField::new("color", e))?,
            slug: TagSlug::try_from(body.slug)
                .map_err(|e| InvalidField::new("slug", e))?,
        })
    }
}
