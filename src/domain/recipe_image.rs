use base64::{engine::general_purpose::STANDARD, Engine};

const DATA_URI_PREFIX: &str = "data:image/";

/// A decoded `data:image/<ext>;base64,<payload>` upload.
#[derive(Debug, Clone)]
pub struct RecipeImage {
    extension: String,
    bytes: Vec<u8>,
}

impl RecipeImage {
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<String> for RecipeImage {
    type Error = InvalidImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (header, payload) = value
            .strip_prefix(DATA_URI_PREFIX)
            .and_then(|rest| rest.split_once(";base64,"))
            .ok_or(InvalidImageError::NotADataUri)?;
        let extension = header.to_ascii_lowercase();
        let extension_is_valid = !extension.is_empty()
            && extension.len() <= 10
            && extension.chars().all(|c| c.is_ascii_alphanumeric());
        if !extension_is_valid {
            return Err(InvalidImageError::UnknownFormat(header.to_string()));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(InvalidImageError::InvalidEncoding)?;
        if bytes.is_empty() {
            return Err(InvalidImageError::Empty);
        }
        Ok(Self { extension, bytes })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvalidImageError {
    #[error("Image must be a base64 encoded data URI.")]
    NotADataUri,
    #[error("Unsupported image format \"{0}\".")]
    UnknownFormat(String),
    #[error("Image payload is not valid base64.")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("The submitted image is empty.")]
    Empty,
}
