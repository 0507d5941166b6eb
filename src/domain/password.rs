use secrecy::Secret;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<String> for Password {
    type Error = InvalidPasswordError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(InvalidPasswordError::PasswordIsEmpty)
        } else if value.graphemes(true).count() > 50 {
            Err(InvalidPasswordError::PasswordTooLong)
        } else {
            Ok(Self(Secret::new(value)))
        }
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidPasswordError {
    #[error("Password may not be blank.")]
    PasswordIsEmpty,
    #[error("Password is too long.")]
    PasswordTooLong,
}
