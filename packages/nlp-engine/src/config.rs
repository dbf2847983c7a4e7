/// Configuration for the model provider and model descriptors
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Maximum supported sequence length for transformer models
/// Limited by attention matrix memory requirements (O(n²))
const MAX_SUPPORTED_SEQUENCE_LENGTH: usize = 8192;

/// How a model turns text into a single vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Tokenizer + transformer forward pass, mean-pooled over the attention mask.
    TokenBased,
    /// Sentence-embedding model with a single-call encode.
    DirectEncode,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::TokenBased => write!(f, "token_based"),
            ModelKind::DirectEncode => write!(f, "direct_encode"),
        }
    }
}

/// A model name paired with its kind. The name is the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub kind: ModelKind,
}

impl ModelSpec {
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn token_based(name: impl Into<String>) -> Self {
        Self::new(name, ModelKind::TokenBased)
    }

    pub fn direct_encode(name: impl Into<String>) -> Self {
        Self::new(name, ModelKind::DirectEncode)
    }
}

/// Configuration shared by model providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Directory holding one sub-directory per model (tokenizer.json + model.onnx)
    pub models_dir: Option<PathBuf>,

    /// Maximum sequence length for tokenization (longer input is truncated)
    pub max_sequence_length: usize,

    /// Number of query embeddings remembered per model
    pub query_cache_capacity: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            models_dir: None,
            max_sequence_length: 512,
            query_cache_capacity: 1024,
        }
    }
}

impl ProviderConfig {
    /// Resolve the directory for a model, falling back to ~/.resmatch/models/
    ///
    /// - macOS/Linux: ~/.resmatch/models/<sanitized model name>/
    /// - Windows: %USERPROFILE%\.resmatch\models\<sanitized model name>\
    pub fn resolve_model_dir(&self, model_name: &str) -> Result<PathBuf, std::io::Error> {
        let base = match &self.models_dir {
            Some(dir) => dir.clone(),
            None => {
                let home_dir = dirs::home_dir().ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "Cannot determine home directory",
                    )
                })?;
                home_dir.join(".resmatch").join("models")
            }
        };

        let model_dir = base.join(sanitize_model_name(model_name));

        if model_dir.exists() {
            Ok(model_dir)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!(
                    "Model not found at {:?}. Export it to ONNX and place tokenizer.json and model.onnx there",
                    model_dir
                ),
            ))
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sequence_length == 0 {
            return Err("max_sequence_length must be greater than 0".to_string());
        }

        if self.max_sequence_length > MAX_SUPPORTED_SEQUENCE_LENGTH {
            return Err(format!(
                "max_sequence_length cannot exceed {} (transformer attention matrix memory limit)",
                MAX_SUPPORTED_SEQUENCE_LENGTH
            ));
        }

        if self.query_cache_capacity == 0 {
            return Err("query_cache_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Sanitize model name to be filesystem-safe
/// Replaces all filesystem-unsafe characters with hyphens
/// Filters out control characters for additional safety
pub fn sanitize_model_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '<' | '>' | '|' | '"' => '-',
            _ => c,
        })
        .collect()
}
