//! Lazy model cache.
//!
//! Models are materialized on first request and retained for the life of the
//! cache, keyed by model name. Two specs sharing a name share one entry.
//!
//! # Concurrency
//!
//! Construction runs outside the lock. Two concurrent first requests for the
//! same uncached model may both construct it; the later insert replaces the
//! earlier one. Each caller still receives a working handle, so the only cost
//! is duplicate work. Failed constructions are never cached.

use crate::config::{ModelSpec, ProviderConfig};
use crate::embedding::EmbeddingModel;
use crate::error::{EmbeddingError, Result};
use crate::provider::ModelProvider;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Shared handle to a cached model
pub type ModelHandle = Arc<EmbeddingModel>;

pub struct ModelCache {
    provider: Arc<dyn ModelProvider>,
    config: ProviderConfig,
    entries: RwLock<HashMap<String, ModelHandle>>,
}

impl ModelCache {
    pub fn new(provider: Arc<dyn ModelProvider>, config: ProviderConfig) -> Result<Self> {
        config.validate().map_err(EmbeddingError::ConfigError)?;

        Ok(Self {
            provider,
            config,
            entries: RwLock::new(HashMap::new()),
        })
    }

    /// Return the cached model for `spec.name`, constructing it on first use.
    pub fn ensure_loaded(&self, spec: &ModelSpec) -> Result<ModelHandle> {
        if let Some(handle) = self.get(&spec.name) {
            tracing::debug!("Model cache hit: {}", spec.name);
            return Ok(handle);
        }

        tracing::info!(
            "Loading embedding model {} ({}) via {}",
            spec.name,
            spec.kind,
            self.provider.name()
        );
        let start = Instant::now();

        let backend = self.provider.load(spec).map_err(|e| {
            tracing::warn!("Failed to load model {}: {}", spec.name, e);
            e
        })?;
        let handle = Arc::new(EmbeddingModel::new(
            spec.clone(),
            backend,
            self.config.query_cache_capacity,
        )?);

        {
            let mut entries = self.entries.write().unwrap_or_else(|p| p.into_inner());
            entries.insert(spec.name.clone(), Arc::clone(&handle));
        }

        tracing::info!("Model {} loaded in {:?}", spec.name, start.elapsed());
        Ok(handle)
    }

    /// Look up a model without loading it
    pub fn get(&self, model_name: &str) -> Option<ModelHandle> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        entries.get(model_name).cloned()
    }

    pub fn is_loaded(&self, model_name: &str) -> bool {
        self.get(model_name).is_some()
    }

    /// Names of all materialized models, sorted
    pub fn loaded_models(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|p| p.into_inner());
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCache")
            .field("provider", &self.provider.name())
            .field("loaded", &self.loaded_models())
            .finish()
    }
}
