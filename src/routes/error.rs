use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    database::{is_unique_violation, violated_constraint},
    domain::InvalidField,
};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] InvalidField),
    #[error("{0}")]
    BadRequest(String),
    #[error("Authentication credentials were not provided or are invalid.")]
    Unauthorized,
    #[error("You do not have permission to perform this action.")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl ApiError {
    pub fn field(field: &'static str, message: impl ToString) -> Self {
        Self::Validation(InvalidField::new(field, message))
    }

    pub fn not_found(what: &str, id: i32) -> Self {
        Self::NotFound(format!("{what} {id} does not exist."))
    }

    /// Turns unique-constraint violations on user-facing columns into field
    /// errors; anything else is unexpected.
    pub fn from_database(error: diesel::result::Error) -> Self {
        if !is_unique_violation(&error) {
            return error.into();
        }
        let known = match violated_constraint(&error) {
            Some("users_username_key") => {
                Some(("username", "A user with that username already exists."))
            }
            Some("users_email_key") => {
                Some(("email", "A user with that email already exists."))
            }
            Some("recipes_name_key") => {
                Some(("name", "A recipe with that name already exists."))
            }
            Some("tags_name_key") => {
                Some(("name", "A tag with that name already exists."))
            }
            Some("tags_slug_key") => {
                Some(("slug", "A tag with that slug already exists."))
            }
            Some("ingredients_name_key" | "ingredient_name_unit_unique") => {
                Some(("name", "An ingredient with that name already exists."))
            }
            _ => None,
        };
        match known {
            Some((field, message)) => Self::field(field, message),
            None => error.into(),
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(error: diesel::result::Error) -> Self {
        Self::UnexpectedError(
            anyhow::Error::new(error).context("Unknown database error."),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::UnexpectedError(_) => {
                tracing::error!("{} Reason: {:?}", self, self)
            }
            _ => tracing::info!("Request rejected: {}", self),
        }
        let (status, body) = match self {
            ApiError::Validation(InvalidField { field, message }) => {
                let mut errors = serde_json::Map::new();
                errors.insert(field.to_string(), json!([message]));
                (StatusCode::BAD_REQUEST, serde_json::Value::Object(errors))
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "errors": message }))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": ApiError::Unauthorized.to_string() }),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "detail": ApiError::Forbidden.to_string() }),
            ),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({ "detail": message }))
            }
            ApiError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": "Something went wrong." }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
