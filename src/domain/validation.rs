use unicode_segmentation::UnicodeSegmentation;

/// A rejected input, tagged with the request field it came from.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct InvalidField {
    pub field: &'static str,
    pub message: String,
}

impl InvalidField {
    pub fn new(field: &'static str, message: impl ToString) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Non-blank text of at most `max_length` graphemes.
pub fn required_text(
    field: &'static str,
    value: String,
    max_length: usize,
) -> Result<String, InvalidField> {
    if value.trim().is_empty() {
        return Err(InvalidField::new(field, "This field may not be blank."));
    }
    if value.graphemes(true).count() > max_length {
        return Err(InvalidField::new(
            field,
            format!("Ensure this field has no more than {max_length} characters."),
        ));
    }
    Ok(value)
}
