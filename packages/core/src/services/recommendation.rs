//! Recommendation Orchestrator
//!
//! [`RecommendationEngine`] owns every startup-loaded store and the model
//! cache. It is built once at process start and shared by reference with
//! request handlers; after construction only the model cache mutates.
//!
//! # Request flow
//!
//! 1. Resolve the model and metric labels and the model's vector partition.
//!    Anything missing is an expected outcome and comes back as
//!    [`RecommendationResponse::Error`].
//! 2. Materialize the model through the cache (first use only) and embed
//!    the topic. Failures here are `Err`.
//! 3. Rank every candidate in the partition, keep the first `top_k`, and
//!    join each with the metadata store.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{
    FacultyData, MetricIdentifier, ModelIdentifier, RankedResult, RecommendationResponse,
};
use crate::services::similarity::rank;
use crate::store::{load_stores, MetadataStore, StartupReport, VectorStore};
use resmatch_nlp_engine::{ModelCache, ModelProvider};
use std::sync::Arc;
use std::time::Instant;

pub struct RecommendationEngine {
    config: EngineConfig,
    vectors: VectorStore,
    metadata: MetadataStore,
    models: ModelCache,
    report: StartupReport,
}

impl RecommendationEngine {
    /// Validate `config`, load every configured source, and set up the model
    /// cache over `provider`.
    ///
    /// Only an invalid configuration fails. Unreadable sources are recorded
    /// in [`RecommendationEngine::report`] and leave their store empty.
    pub fn load(config: EngineConfig, provider: Arc<dyn ModelProvider>) -> Result<Self> {
        config.validate()?;
        let models = ModelCache::new(provider, config.provider.clone())?;
        let (vectors, metadata, report) = load_stores(&config);

        tracing::info!(
            "Recommendation engine ready: {}/{} models with vectors, provider '{}'",
            vectors.loaded().len(),
            config.models.len(),
            models.provider_name()
        );

        Ok(Self {
            config,
            vectors,
            metadata,
            models,
            report,
        })
    }

    /// Assemble an engine from stores built elsewhere
    pub fn from_parts(
        config: EngineConfig,
        vectors: VectorStore,
        metadata: MetadataStore,
        models: ModelCache,
    ) -> Self {
        Self {
            config,
            vectors,
            metadata,
            models,
            report: StartupReport::default(),
        }
    }

    /// Recommend researchers for `topic` using display labels for the model
    /// and metric.
    pub fn recommend(&self, topic: &str, model: &str, metric: &str) -> Result<RecommendationResponse> {
        let Some(model_id) = ModelIdentifier::from_label(model) else {
            return Ok(RecommendationResponse::error(format!(
                "Model '{}' is not available",
                model.trim()
            )));
        };
        let Some(metric_id) = MetricIdentifier::from_label(metric) else {
            return Ok(RecommendationResponse::error(format!(
                "Metric '{}' is not supported",
                metric.trim()
            )));
        };
        self.recommend_with(topic, model_id, metric_id)
    }

    pub fn recommend_with(
        &self,
        topic: &str,
        model: ModelIdentifier,
        metric: MetricIdentifier,
    ) -> Result<RecommendationResponse> {
        let Some(entry) = self.config.model(model) else {
            return Ok(RecommendationResponse::error(format!(
                "Model '{}' is not configured",
                model
            )));
        };
        let Some(partition) = self.vectors.partition(model) else {
            return Ok(RecommendationResponse::error(format!(
                "Embeddings for model '{}' are not loaded",
                model
            )));
        };
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(RecommendationResponse::error("Topic must not be empty"));
        }
        if partition.is_empty() {
            tracing::debug!("No researcher vectors for model {}", model);
            return Ok(RecommendationResponse::Recommendations(Vec::new()));
        }

        let start = Instant::now();
        let handle = self.models.ensure_loaded(&entry.spec())?;
        let query = handle.embed(topic)?;

        let ranked = rank(&query, partition.iter(), metric);
        let candidates = ranked.len();
        let results: Vec<RankedResult> = ranked
            .into_iter()
            .take(self.config.top_k)
            .map(|(id, score)| RankedResult::new(score, self.metadata.record(id.as_str())))
            .collect();

        tracing::debug!(
            "Recommended {} of {} candidates for model {} / metric {} in {:?}",
            results.len(),
            candidates,
            model,
            metric,
            start.elapsed()
        );

        Ok(RecommendationResponse::Recommendations(results))
    }

    /// Faculty names known to the metadata store
    pub fn faculties(&self) -> Vec<String> {
        self.metadata.faculties()
    }

    pub fn faculty_data(&self, faculty: &str) -> Option<FacultyData> {
        self.metadata.faculty_data(faculty)
    }

    /// Identifiers that are configured and have a loaded vector partition
    pub fn available_models(&self) -> Vec<ModelIdentifier> {
        self.vectors
            .loaded()
            .into_iter()
            .filter(|id| self.config.model(*id).is_some())
            .collect()
    }

    pub fn report(&self) -> &StartupReport {
        &self.report
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    pub fn vectors(&self) -> &VectorStore {
        &self.vectors
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }
}
