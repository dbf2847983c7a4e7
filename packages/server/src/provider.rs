//! Model provider selection for the server binary

use resmatch_nlp_engine::{
    EmbeddingError, ModelBackend, ModelProvider, ModelSpec, ProviderConfig, Result,
};
use std::sync::Arc;

/// Provider for builds without a model runtime. Every load fails, so
/// recommendation requests return a model error while the directory
/// endpoints keep working.
#[derive(Debug, Default)]
pub struct UnavailableProvider;

impl ModelProvider for UnavailableProvider {
    fn load(&self, spec: &ModelSpec) -> Result<ModelBackend> {
        Err(EmbeddingError::ModelLoadError(format!(
            "cannot load {}: server built without the embedding-service feature",
            spec.name
        )))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Provider backing the engine's model cache
#[cfg(feature = "embedding-service")]
pub fn build_provider(config: &ProviderConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
    let provider = resmatch_nlp_engine::OnnxModelProvider::new(config.clone())?;
    Ok(Arc::new(provider))
}

/// Provider backing the engine's model cache
#[cfg(not(feature = "embedding-service"))]
pub fn build_provider(_config: &ProviderConfig) -> anyhow::Result<Arc<dyn ModelProvider>> {
    tracing::warn!("Built without the embedding-service feature; model loads will fail");
    Ok(Arc::new(UnavailableProvider))
}
