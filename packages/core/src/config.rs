//! Engine configuration
//!
//! One JSON document describes every startup source and the model registry.
//! All fields have defaults, so a partial file (or none at all) is valid.
//! Relative paths resolve against `data_dir`.

use crate::error::{EngineError, Result};
use crate::models::ModelIdentifier;
use resmatch_nlp_engine::{ModelKind, ModelSpec, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Number of ranked results returned per request
pub const DEFAULT_TOP_K: usize = 10;

/// Upper bound on `top_k`; a response never carries more entries
pub const MAX_TOP_K: usize = 10;

/// Number of focus topics kept per researcher
pub const DEFAULT_TOP_TOPICS: usize = 4;

/// Registry entry binding a model identifier to a model and its vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: ModelIdentifier,
    pub model_name: String,
    pub kind: ModelKind,
    /// JSON map of researcher name -> embedding vector
    pub vectors: PathBuf,
}

impl ModelEntry {
    /// Entry using the identifier's default model and `embeddings/<label>.json`
    pub fn with_defaults(id: ModelIdentifier) -> Self {
        let spec = id.default_spec();
        Self {
            id,
            model_name: spec.name,
            kind: spec.kind,
            vectors: PathBuf::from("embeddings")
                .join(format!("{}.json", id.label().to_lowercase())),
        }
    }

    pub fn spec(&self) -> ModelSpec {
        ModelSpec::new(self.model_name.clone(), self.kind)
    }
}

/// Tabular metadata sources (CSV with header row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSources {
    /// name -> research center
    pub research_centers: Option<PathBuf>,
    /// name -> (topic, weight) rows
    pub topics: Option<PathBuf>,
    /// name -> (faculty, department); later rosters override earlier ones
    pub rosters: Vec<PathBuf>,
}

impl Default for MetadataSources {
    fn default() -> Self {
        Self {
            research_centers: Some(PathBuf::from("metadata/research_centers.csv")),
            topics: Some(PathBuf::from("metadata/topics.csv")),
            rosters: vec![PathBuf::from("metadata/roster.csv")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base directory for relative source paths
    pub data_dir: PathBuf,

    pub models: Vec<ModelEntry>,

    pub metadata: MetadataSources,

    /// Maximum results per recommendation
    pub top_k: usize,

    /// Focus topics kept per researcher
    pub top_topics: usize,

    /// Model provider settings (model directory, tokenization, query cache)
    pub provider: ProviderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            models: ModelIdentifier::ALL
                .into_iter()
                .map(ModelEntry::with_defaults)
                .collect(),
            metadata: MetadataSources::default(),
            top_k: DEFAULT_TOP_K,
            top_topics: DEFAULT_TOP_TOPICS,
            provider: ProviderConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.models {
            if !seen.insert(entry.id) {
                return Err(EngineError::config(format!(
                    "model {} is configured more than once",
                    entry.id
                )));
            }
            if entry.model_name.trim().is_empty() {
                return Err(EngineError::config(format!(
                    "model {} has an empty model_name",
                    entry.id
                )));
            }
        }

        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(EngineError::config(format!(
                "top_k must be between 1 and {}",
                MAX_TOP_K
            )));
        }

        if self.top_topics == 0 {
            return Err(EngineError::config("top_topics must be greater than 0"));
        }

        self.provider.validate().map_err(EngineError::Config)
    }

    pub fn model(&self, id: ModelIdentifier) -> Option<&ModelEntry> {
        self.models.iter().find(|entry| entry.id == id)
    }

    /// Resolve a source path against `data_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.models.len(), 5);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.top_topics, 4);
        assert!(config.validate().is_ok());

        let mpnet = config.model(ModelIdentifier::MpNet).unwrap();
        assert_eq!(mpnet.kind, ModelKind::DirectEncode);
        assert_eq!(mpnet.vectors, PathBuf::from("embeddings/mpnet.json"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.models.push(ModelEntry::with_defaults(ModelIdentifier::Bert));
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.models[0].model_name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.top_topics = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_top_k_capped() {
        let mut config = EngineConfig::default();
        config.top_k = MAX_TOP_K;
        assert!(config.validate().is_ok());

        config.top_k = 50;
        assert!(matches!(config.validate(), Err(EngineError::Config(msg)) if msg.contains("top_k")));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{
                "data_dir": "/srv/resmatch",
                "models": [
                    {"id": "MPNet", "model_name": "all-mpnet-base-v2", "kind": "direct_encode", "vectors": "mpnet.json"}
                ],
                "metadata": {"rosters": ["fakultas.csv", "dosen.csv"]}
            }"#,
        )
        .unwrap();

        assert_eq!(config.models.len(), 1);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.metadata.rosters.len(), 2);
        assert_eq!(
            config.metadata.topics,
            Some(PathBuf::from("metadata/topics.csv"))
        );
        assert_eq!(
            config.resolve(Path::new("mpnet.json")),
            PathBuf::from("/srv/resmatch/mpnet.json")
        );
        assert!(config.model(ModelIdentifier::Bert).is_none());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("resmatch.json");
        std::fs::write(&path, r#"{"top_k": 5}"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.top_k, 5);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(EngineError::Json(_))
        ));
    }
}
