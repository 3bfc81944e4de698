// Error types for gemconvert
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Message shown to callers when a conversion fails upstream.
pub const CONVERSION_FAILED_MESSAGE: &str =
    "An error occurred during code conversion. Please try again.";

/// Message shown to callers when an explanation fails upstream.
pub const EXPLANATION_FAILED_MESSAGE: &str =
    "An error occurred while explaining the code. Please try again.";

#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Remote generation call failed: {0}")]
    RemoteCall(String),

    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Malformed persisted cache data: {0}")]
    CacheParse(String),

    #[error("Source code is empty")]
    EmptySource,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConverterError {
    /// True for failures of the remote generation capability.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ConverterError::RemoteCall(_) | ConverterError::MissingApiKey
        )
    }
}

/// An error paired with the operation it came from, so callers can be shown
/// the right generic message without leaking upstream details.
#[derive(Debug)]
pub struct OperationError {
    pub operation: Operation,
    pub source: ConverterError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Convert,
    Explain,
    Other,
}

impl OperationError {
    pub fn convert(source: ConverterError) -> Self {
        Self { operation: Operation::Convert, source }
    }

    pub fn explain(source: ConverterError) -> Self {
        Self { operation: Operation::Explain, source }
    }

    /// Text safe to show the caller: the generic message for remote
    /// failures, the error itself otherwise.
    pub fn user_message(&self) -> String {
        if !self.source.is_remote() {
            return self.source.to_string();
        }
        match self.operation {
            Operation::Explain => EXPLANATION_FAILED_MESSAGE.to_string(),
            _ => CONVERSION_FAILED_MESSAGE.to_string(),
        }
    }
}

impl From<ConverterError> for OperationError {
    fn from(source: ConverterError) -> Self {
        Self { operation: Operation::Other, source }
    }
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        if self.source.is_remote() {
            return error_body(StatusCode::BAD_GATEWAY, "api_error", self.user_message());
        }
        self.source.into_response()
    }
}

// Convert ConverterError to HTTP responses for Axum
impl IntoResponse for ConverterError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ConverterError::EmptySource | ConverterError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", self.to_string())
            }
            ConverterError::RemoteCall(_) | ConverterError::MissingApiKey => {
                (StatusCode::BAD_GATEWAY, "api_error", CONVERSION_FAILED_MESSAGE.to_string())
            }
            ConverterError::Config(_) | ConverterError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", self.to_string())
            }
            ConverterError::CacheParse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", self.to_string())
            }
            _ => {
                (StatusCode::INTERNAL_SERVER_ERROR, "api_error", self.to_string())
            }
        };

        error_body(status, error_type, message)
    }
}

fn error_body(status: StatusCode, error_type: &str, message: String) -> Response {
    let body = json!({
        "type": "error",
        "error": {
            "type": error_type,
            "message": message,
        }
    });

    (status, axum::Json(body)).into_response()
}

pub type Result<T> = std::result::Result<T, ConverterError>;
