//! Error types for gastrohealth.
//!
//! This module defines all error types used throughout the gastrohealth crate.
//! The HTTP layer maps them onto status codes in [`crate::server::ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gastrohealth operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    /// A request was missing a field or carried an invalid value.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// No record exists for the given email.
    #[error("user not found: {email}")]
    UserNotFound {
        /// The email that was looked up.
        email: String,
    },

    // === Storage Errors ===
    /// The database file exists but is not a valid document.
    #[error("database file {path} is corrupt: {source}")]
    StoreCorrupt {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Generative Model Errors ===
    /// No API key is configured for the generative model.
    #[error("no API key configured for the generative model")]
    MissingApiKey,

    /// The request to the generative model could not be sent or read.
    #[error("model request failed: {0}")]
    ModelRequest(#[from] reqwest::Error),

    /// The generative model answered with a non-success status.
    #[error("model returned status {status}: {body}")]
    ModelStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The generative model answered without usable text.
    #[error("model returned no content: {message}")]
    ModelResponse {
        /// Why the response was unusable.
        message: String,
    },

    /// The model's text did not match the requested shape.
    #[error("model output did not match the expected shape: {source}")]
    ModelOutput {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A blocking store task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    StorageTask(#[from] tokio::task::JoinError),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for gastrohealth operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a user not found error.
    #[must_use]
    pub fn user_not_found(email: impl Into<String>) -> Self {
        Self::UserNotFound {
            email: email.into(),
        }
    }

    /// Create an error for an unusable model response.
    #[must_use]
    pub fn model_response(message: impl Into<String>) -> Self {
        Self::ModelResponse {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad client input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Check if this error means the user does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound { .. })
    }
}
