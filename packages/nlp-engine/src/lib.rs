/// ResMatch NLP Engine - Embedding Model Cache
///
/// This crate owns everything between a model name and a query vector:
/// lazily materialized models, their tokenizers, and pooling.
///
/// # Features
///
/// - **Lazy Model Cache**: models are constructed on first use and shared by name
/// - **Two Model Kinds**: token-based (tokenize + forward + mean pooling) and
///   direct-encode sentence models, behind one `embed(text)` call
/// - **Query Cache**: LRU cache of query embeddings per model
/// - **ONNX Backend**: Candle-based ONNX provider behind the `embedding-service` feature
///
/// # Example
///
/// ```ignore
/// use resmatch_nlp_engine::{ModelCache, ModelSpec, OnnxModelProvider, ProviderConfig};
/// use std::sync::Arc;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ProviderConfig::default();
///     let provider = Arc::new(OnnxModelProvider::new(config.clone())?);
///     let cache = ModelCache::new(provider, config)?;
///
///     let model = cache.ensure_loaded(&ModelSpec::token_based("bert-base-uncased"))?;
///     let vector = model.embed("machine learning")?;
///     println!("Embedding dimension: {}", vector.len());
///
///     Ok(())
/// }
/// ```
pub mod cache;
pub mod config;
pub mod embedding;
pub mod error;
#[cfg(feature = "embedding-service")]
pub mod onnx;
pub mod pooling;
pub mod provider;

// Re-export main types
pub use cache::{ModelCache, ModelHandle};
pub use config::{ModelKind, ModelSpec, ProviderConfig};
pub use embedding::EmbeddingModel;
pub use error::{EmbeddingError, Result};
#[cfg(feature = "embedding-service")]
pub use onnx::OnnxModelProvider;
pub use pooling::mean_pool;
pub use provider::{
    ModelBackend, ModelProvider, SentenceEncoder, TextTokenizer, TokenBatch, TokenEncoder,
};
