//! Mapping of service errors onto HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::AuthError;
use crate::error::BrainError;

/// Error returned by HTTP handlers and the auth gate.
#[derive(Debug)]
pub struct ApiError(pub BrainError);

impl From<BrainError> for ApiError {
    fn from(err: BrainError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(BrainError::Unauthorized(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let err = match rejection {
            // A body that is not JSON carries none of the required fields
            JsonRejection::MissingJsonContentType(_) => {
                BrainError::MissingFields("Request body must be JSON".to_string())
            }
            other => BrainError::Validation(vec![other.body_text()]),
        };
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BrainError::MissingFields(_) => StatusCode::LENGTH_REQUIRED,
            BrainError::Validation(_) => StatusCode::BAD_REQUEST,
            BrainError::UsernameTaken
            | BrainError::UnknownUsername
            | BrainError::WrongPassword
            | BrainError::ContentNotFound => StatusCode::FORBIDDEN,
            BrainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BrainError::InvalidShareLink | BrainError::ShareOwnerMissing => {
                StatusCode::LENGTH_REQUIRED
            }
            BrainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self.0 {
            BrainError::Validation(details) => json!({
                "error": "Validation failed",
                "details": details,
            }),
            // Token problems get a fixed message; the reason is logged by the gate
            BrainError::Unauthorized(_) => json!({ "error": "Unauthorized" }),
            BrainError::InvalidShareLink => json!({ "error": "Incorrect input" }),
            BrainError::ShareOwnerMissing => json!({
                "error": "Incorrect input: no user exists for this share link"
            }),
            BrainError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({ "error": "Internal server error" })
            }
            BrainError::MissingFields(msg) => json!({ "error": msg }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
