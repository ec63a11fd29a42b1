use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    /// The key set could not be fetched or the token's key id is unknown.
    /// Validation fails closed, so this is still an authentication failure
    /// from the caller's point of view.
    #[error("key set unavailable")]
    KeySetUnavailable,

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_auth_failure(err: &AuthError) {
    match err {
        AuthError::MissingToken => warn!("Authentication failed: missing Authorization token."),
        AuthError::InvalidToken => warn!("Authentication failed: invalid token provided."),
        AuthError::KeySetUnavailable => {
            warn!("Authentication failed: could not resolve a signing key.");
        }
        AuthError::Internal(e) => error!("Internal error during authentication: {:?}", e),
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        log_auth_failure(&self);

        let (status, error_message) = match self {
            Self::MissingToken | Self::InvalidToken | Self::KeySetUnavailable => {
                (StatusCode::UNAUTHORIZED, "Authentication failed")
            }
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred",
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
