use unicode_segmentation::UnicodeSegmentation;

/// Path segment reserved for the current-user endpoints.
pub const RESERVED_USERNAME: &str = "me";

#[derive(Debug, Clone)]
pub struct UserName(String);

impl TryFrom<String> for UserName {
    type Error = InvalidUserNameError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(InvalidUserNameError::NameIsEmpty);
        }
        if value.graphemes(true).count() > 150 {
            return Err(InvalidUserNameError::NameIsTooLong);
        }
        let has_forbidden_chars = value.chars().any(|c| {
            !(c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
        });
        if has_forbidden_chars {
            return Err(InvalidUserNameError::ForbiddenCharacters);
        }
        if value == RESERVED_USERNAME {
            Err(InvalidUserNameError::Reserved)
        } else {
            Ok(Self(value))
        }
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidUserNameError {
    #[error("Username is too long.")]
    NameIsTooLong,
    #[error("Username is empty.")]
    NameIsEmpty,
    #[error("Username may contain only letters, digits and @/./+/-/_.")]
    ForbiddenCharacters,
    #[error("Username \"me\" is not allowed.")]
    Reserved,
}
