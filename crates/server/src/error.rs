//! JSON error responses for the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postgrade_core::PostgradeError;
use serde::Serialize;

pub const URL_REQUIRED: &str = "URL is required";
pub const INVALID_URL: &str = "Invalid URL format. Please provide a valid HTTP or HTTPS URL.";
pub const INTERNAL_ERROR: &str = "An error occurred while fetching the blog";

#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input. Always 400.
    Validation(&'static str),
    /// A classified core failure. 400 for validation errors, 500 otherwise.
    Core(PostgradeError),
    /// Anything else. 500 with a generic message; `detail` goes to `details`.
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Core(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            Self::Core(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PostgradeError> for ApiError {
    fn from(err: PostgradeError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(message) => {
                ErrorBody { success: false, error: message.to_string(), code: Some("validation_error"), details: None }
            }
            Self::Core(err) => {
                tracing::warn!(code = err.code(), error = %err, "request failed");
                ErrorBody { success: false, error: err.to_string(), code: Some(err.code()), details: None }
            }
            Self::Internal(detail) => {
                tracing::error!(%detail, "unexpected failure");
                ErrorBody {
                    success: false,
                    error: INTERNAL_ERROR.to_string(),
                    code: Some("unexpected_error"),
                    details: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Validation(URL_REQUIRED).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(PostgradeError::InvalidUrl("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(PostgradeError::Forbidden).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Internal("join".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
