//! HTTP error mapping.
//!
//! Every failure leaves the service as `{"detail": "<message>"}` with a
//! status chosen from the error's [`ErrorKind`].

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use helper_core::{AppError, ErrorKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Like `From<AppError>`, but prefixes processing failures with what the
    /// request was doing.
    pub fn with_context(err: AppError, context: &str) -> Self {
        match err.kind() {
            ErrorKind::Processing => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}: {}", context, err),
            ),
            _ => err.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match err.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Processing => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        // 413 when the body limit tripped mid-stream, 400 otherwise
        let status = match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.detail);
        } else {
            tracing::debug!(status = %self.status, "{}", self.detail);
        }

        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status() {
        let cases = [
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (AppError::session_not_found("abc"), StatusCode::NOT_FOUND),
            (AppError::Llm("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Ingest("bad pdf".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_context_only_for_processing() {
        let err = ApiError::with_context(AppError::Embedding("timeout".into()), "Error processing query");
        assert_eq!(err.detail(), "Error processing query: Embedding error: timeout");

        let err = ApiError::with_context(AppError::session_not_found("abc"), "Error processing query");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.detail().starts_with("Session ID 'abc' not found"));
    }
}
