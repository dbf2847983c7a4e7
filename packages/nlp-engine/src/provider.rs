//! Model provider seam.
//!
//! A provider turns a [`ModelSpec`] into a ready [`ModelBackend`]. Tokenization
//! and transformer inference stay behind the traits below, so the cache and
//! pooling logic never depend on a specific runtime.

use crate::config::{ModelKind, ModelSpec};
use crate::error::Result;

/// Token ids and masks for a single input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBatch {
    pub ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub type_ids: Vec<u32>,
}

impl TokenBatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keep at most `max_len` tokens. Masks shorter than the ids are left as is.
    pub fn truncate(&mut self, max_len: usize) {
        self.ids.truncate(max_len);
        self.attention_mask.truncate(max_len);
        self.type_ids.truncate(max_len);
    }
}

/// Tokenizer with padding/truncation already configured.
pub trait TextTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenBatch>;
}

/// Transformer forward pass returning one embedding per token (`[seq_len][hidden]`).
pub trait TokenEncoder: Send + Sync {
    fn forward(&self, tokens: &TokenBatch) -> Result<Vec<Vec<f32>>>;
}

/// Sentence-embedding model with a direct encode call.
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;
}

/// A materialized model, selected once at load time.
pub enum ModelBackend {
    TokenBased {
        tokenizer: Box<dyn TextTokenizer>,
        model: Box<dyn TokenEncoder>,
    },
    DirectEncode {
        model: Box<dyn SentenceEncoder>,
    },
}

impl ModelBackend {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelBackend::TokenBased { .. } => ModelKind::TokenBased,
            ModelBackend::DirectEncode { .. } => ModelKind::DirectEncode,
        }
    }
}

impl std::fmt::Debug for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBackend")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Constructs models by name and kind.
///
/// Construction may be slow (weight deserialization, file IO) and runs on
/// the calling thread.
pub trait ModelProvider: Send + Sync {
    fn load(&self, spec: &ModelSpec) -> Result<ModelBackend>;

    /// Human-readable provider name for logging.
    fn name(&self) -> &str;
}
