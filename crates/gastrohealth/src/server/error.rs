//! HTTP error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::Error;

/// Message sent for unknown emails.
pub const USER_NOT_FOUND: &str = "User not found";

/// Message sent when a storage operation fails.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// An error returned to the client as `{"error": message}`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// A 400 with the given message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// The 404 for an unknown email.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: USER_NOT_FOUND.to_string(),
        }
    }

    /// Map a library error, using `message` for anything that is not the
    /// client's fault.
    ///
    /// Internal failures are logged here since their details never reach
    /// the client.
    #[must_use]
    pub fn from_error(err: Error, message: &str) -> Self {
        match err {
            Error::InvalidInput { message } => Self::bad_request(message),
            Error::UserNotFound { .. } => Self::not_found(),
            other => {
                error!(error = %other, "{message}");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: message.to_string(),
                }
            }
        }
    }

    /// Closure form of [`ApiError::from_error`] for `map_err`.
    pub fn context(message: &'static str) -> impl FnOnce(Error) -> Self {
        move |err| Self::from_error(err, message)
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the client.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; every other rejection is a 400.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::from_error(Error::invalid_input("painLevel too high"), "ignored");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "painLevel too high");
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let err = ApiError::from_error(Error::user_not_found("a@example.com"), "ignored");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), USER_NOT_FOUND);
    }

    #[test]
    fn test_other_errors_hide_details() {
        let err = ApiError::context("Failed to suggest recipe")(Error::MissingApiKey);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to suggest recipe");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = ApiError::bad_request("Email is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Email is required" })
        );
    }
}
