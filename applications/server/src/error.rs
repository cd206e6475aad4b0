/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use shelf_core::{AlbumField, ShelfError, ValidationErrors};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] ShelfError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<shelf_storage::StorageError> for ServerError {
    fn from(err: shelf_storage::StorageError) -> Self {
        // Convert StorageError -> ShelfError -> ServerError
        ServerError::Core(err.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServerError::Core(err) => match err {
                ShelfError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                ShelfError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
                ShelfError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
                ShelfError::AlbumInvalid(_) | ShelfError::UserInvalid(_) => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                other => {
                    tracing::error!("Database error: {:?}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                    )
                }
            },
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::error!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid session".to_string())
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// A form submission that has to be shown again
///
/// Carries the submitted values back so the form can be refilled, plus either
/// a single message (`errorMessage`) or per-field errors (`errors`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRejection<V> {
    #[serde(skip)]
    status: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors<AlbumField>>,

    values: V,
}

impl<V: Serialize> FormRejection<V> {
    /// Rejection with a single message
    pub fn message(status: StatusCode, message: impl Into<String>, values: V) -> Self {
        Self {
            status,
            error_message: Some(message.into()),
            errors: None,
            values,
        }
    }

    /// 400 rejection with per-field album errors
    pub fn invalid_album(errors: ValidationErrors<AlbumField>, values: V) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error_message: None,
            errors: Some(errors),
            values,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<V: Serialize> IntoResponse for FormRejection<V> {
    fn into_response(self) -> Response {
        tracing::debug!("Form rejected with status {}", self.status);
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::FieldErrorKind;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (ShelfError::not_found("Album", "x"), StatusCode::NOT_FOUND),
            (ShelfError::forbidden("nope"), StatusCode::FORBIDDEN),
            (ShelfError::duplicate("taken"), StatusCode::CONFLICT),
            (ShelfError::storage("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn test_form_rejection_body() {
        let mut errors = ValidationErrors::new();
        errors.add(AlbumField::Title, FieldErrorKind::Required, "Title is required");

        let rejection = FormRejection::invalid_album(errors, json!({ "title": "" }));
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(&rejection).unwrap();
        assert_eq!(body["errors"]["title"]["message"], "Title is required");
        assert_eq!(body["errors"]["title"]["kind"], "required");
        assert_eq!(body["values"]["title"], "");
        assert!(body.get("errorMessage").is_none());
    }

    #[test]
    fn test_form_rejection_message() {
        let rejection =
            FormRejection::message(StatusCode::UNAUTHORIZED, "Invalid password", json!({}));
        let body = serde_json::to_value(&rejection).unwrap();
        assert_eq!(body["errorMessage"], "Invalid password");
        assert!(body.get("errors").is_none());
    }
}
