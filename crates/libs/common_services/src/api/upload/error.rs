use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The album's upload window has closed; it is read-only until deletion.
    #[error("Upload window closed for album {0}")]
    WindowClosed(String),

    #[error("File {0} is too large")]
    FileTooLarge(String),

    #[error("Image count limit is {0}")]
    TooManyImages(usize),

    #[error("File {name} is not a usable image: {reason}")]
    InvalidImage { name: String, reason: String },

    #[error("Could not store {0}")]
    Storage(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

fn log_error(error: &UploadError) {
    match error {
        UploadError::Database(e) => warn!("Database query failed: {}", e),
        UploadError::Internal(e) => warn!("Internal error: {:?}", e),
        other => warn!("Upload -> {}", other),
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_string(),
            ),
            Self::Internal(_) | Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upload failed.".to_string(),
            ),
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, format!("Album not found: {message}"))
            }
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            Self::WindowClosed(_) => (
                StatusCode::FORBIDDEN,
                "This lobby is locked; the upload window has closed.".to_string(),
            ),
            Self::FileTooLarge(name) => {
                (StatusCode::BAD_REQUEST, format!("File too large: {name}"))
            }
            Self::TooManyImages(limit) => (
                StatusCode::BAD_REQUEST,
                format!("Image count limit is {limit}."),
            ),
            Self::InvalidImage { name, reason } => (
                StatusCode::BAD_REQUEST,
                format!("Not a usable image ({name}): {reason}"),
            ),
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, format!("Bad request: {message}"))
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for UploadError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(sql_err) => Self::Database(sql_err),
            DbError::MalformedRecord(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
