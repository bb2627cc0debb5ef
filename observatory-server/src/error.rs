//! Error types for the observatory API layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::endpoints::StatusBody;

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A failure that an endpoint produces on purpose.
    ///
    /// These are not bugs. They exist so that monitoring has errors to observe.
    #[error("simulated failure: {0}")]
    Simulated(&'static str),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Handlers already log simulated failures with their own message.
            ApiError::Simulated(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusBody::error(message)),
            )
                .into_response(),
        }
    }
}
