//! HTTP error handling
//!
//! Only real failures become an `HttpError`. A misconfigured recommendation
//! request is answered with 200 and an `{"error": ...}` payload instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use resmatch_core::EngineError;
use serde::{Deserialize, Serialize};

/// JSON error body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "FACULTY_NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<EngineError> for HttpError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Embedding(inner) => {
                tracing::error!("Model failure: {}", inner);
                HttpError::with_details(
                    "Failed to run the embedding model",
                    "MODEL_ERROR",
                    inner.to_string(),
                )
            }
            other => {
                tracing::error!("Engine failure: {}", other);
                HttpError::with_details("Internal error", "INTERNAL_ERROR", other.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for HttpError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Blocking task failed: {}", err);
        HttpError::with_details("Internal error", "INTERNAL_ERROR", err.to_string())
    }
}
