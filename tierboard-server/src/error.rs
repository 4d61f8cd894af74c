//! Error types for tierboard-server
//!
//! Every handler returns [`ApiResult`]; failures become a JSON body of the form
//! `{"error": {"code": ..., "message": ...}}` with a matching status code.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tierboard_common::api::{ErrorBody, ErrorDetail};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request body over the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Some stored images could not be deleted during a reset (500)
    #[error("Reset completed, but failed to delete: {}", .0.join(", "))]
    PartialReset(Vec<String>),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// tierboard-common error
    #[error("{0}")]
    Common(#[from] tierboard_common::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        use tierboard_common::Error as CommonError;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::PartialReset(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_RESET"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            ApiError::Common(CommonError::InvalidInput(_) | CommonError::UnknownBucket(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST")
            }
            ApiError::Common(CommonError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Common(CommonError::Io(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            ApiError::Common(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let failed = match &self {
            ApiError::PartialReset(files) => files.clone(),
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
            failed,
        };

        (status, Json(body)).into_response()
    }
}

// Extractor rejections are reported in the same JSON shape as handler errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE),
            (ApiError::PartialReset(vec!["a".into()]), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::Common(tierboard_common::Error::InvalidInput("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_partial_reset_message_lists_files() {
        let err = ApiError::PartialReset(vec!["a.png".into(), "b.png".into()]);
        assert_eq!(err.to_string(), "Reset completed, but failed to delete: a.png, b.png");
    }
}
