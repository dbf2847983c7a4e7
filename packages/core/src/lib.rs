//! ResMatch Core Recommendation Engine
//!
//! This crate ranks researchers against a free-text topic by comparing the
//! topic's embedding with precomputed researcher embeddings, then enriches
//! the ranking with faculty, department, research center and topic context.
//!
//! # Architecture
//!
//! - **Explicitly owned state**: one [`RecommendationEngine`] value holds every
//!   store and the model cache, shared by reference with request handlers
//! - **Startup-loaded stores**: vectors and metadata are read once and are
//!   read-only afterwards
//! - **Observable degradation**: every source yields a [`LoadResult`]; a bad
//!   source never aborts startup
//! - **Lazy models**: embedding models materialize on first use through
//!   [`resmatch_nlp_engine::ModelCache`]
//!
//! # Modules
//!
//! - [`models`] - Identifiers, researcher records, responses
//! - [`store`] - Vector Store, Metadata Store, startup loader
//! - [`services`] - Similarity Engine and Recommendation Orchestrator
//! - [`config`] - Engine configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use config::{
    EngineConfig, MetadataSources, ModelEntry, DEFAULT_TOP_K, DEFAULT_TOP_TOPICS,
    MAX_TOP_K,
};
pub use error::{EngineError, Result};
pub use models::*;
pub use services::RecommendationEngine;
pub use store::{LoadResult, SourceKind, StartupReport};
