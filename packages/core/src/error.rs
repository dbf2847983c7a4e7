//! Engine Error Types
//!
//! Request-level misconfiguration is not represented here; it is returned as
//! `RecommendationResponse::Error`. These errors cover model failures and
//! source-loading problems (the latter are turned into `LoadResult` warnings
//! at startup and never abort loading).

use resmatch_nlp_engine::EmbeddingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Model materialization or inference failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Engine configuration is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Source file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON source or config could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV source could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Source parsed but its content is unusable
    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: PathBuf, reason: String },
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
