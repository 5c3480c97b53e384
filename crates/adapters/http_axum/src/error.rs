//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use winctl_domain::error::WinctlError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`WinctlError`] to an HTTP response with appropriate status code.
pub struct ApiError(WinctlError);

impl From<WinctlError> for ApiError {
    fn from(err: WinctlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WinctlError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            WinctlError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            WinctlError::Store(err) => {
                tracing::error!(error = %err, "entity store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
