use crate::error::CoordinatorError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use huddle_core::ApiResponse;

/// Rejections produced by the HTTP layer, rendered as `ApiResponse` bodies.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Coordinator(CoordinatorError),
}

impl From<CoordinatorError> for ApiError {
    fn from(e: CoordinatorError) -> Self {
        Self::Coordinator(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Coordinator(e @ CoordinatorError::InvalidArgument(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Coordinator(e @ CoordinatorError::Unavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}
