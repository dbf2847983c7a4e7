/// Query embedding on top of a materialized model backend
///
/// - Token-based models: tokenize, forward pass, then attention-masked mean pooling
/// - Direct-encode models: a single `encode` call
///
/// Results are memoized per model in an LRU cache keyed by the query text.
use crate::config::{ModelKind, ModelSpec};
use crate::error::{EmbeddingError, Result};
use crate::pooling::mean_pool;
use crate::provider::ModelBackend;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// A loaded embedding model with its query cache
pub struct EmbeddingModel {
    spec: ModelSpec,
    backend: ModelBackend,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl EmbeddingModel {
    /// Wrap a backend produced by a provider
    pub fn new(spec: ModelSpec, backend: ModelBackend, cache_capacity: usize) -> Result<Self> {
        let cache_capacity = NonZeroUsize::new(cache_capacity).ok_or_else(|| {
            EmbeddingError::ConfigError("query_cache_capacity must be > 0".to_string())
        })?;

        if spec.kind != backend.kind() {
            tracing::warn!(
                "Model {} declared as {} but provider returned {}",
                spec.name,
                spec.kind,
                backend.kind()
            );
        }

        Ok(Self {
            spec,
            backend,
            cache: Mutex::new(LruCache::new(cache_capacity)),
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn kind(&self) -> ModelKind {
        self.backend.kind()
    }

    /// Encode text into a single fixed-length vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Cannot generate embedding for empty text".to_string(),
            ));
        }

        {
            let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(cached) = cache.get(text) {
                return Ok(cached.clone());
            }
        }

        let start = std::time::Instant::now();
        let embedding = match &self.backend {
            ModelBackend::TokenBased { tokenizer, model } => {
                let tokens = tokenizer.tokenize(text)?;
                if tokens.is_empty() {
                    return Err(EmbeddingError::TokenizationError(format!(
                        "Tokenizer for {} produced no tokens",
                        self.spec.name
                    )));
                }
                let token_embeddings = model.forward(&tokens)?;
                mean_pool(&token_embeddings, &tokens.attention_mask)
            }
            ModelBackend::DirectEncode { model } => model.encode(text)?,
        };

        tracing::debug!(
            "Embedded query with {} in {:?} (dimension {})",
            self.spec.name,
            start.elapsed(),
            embedding.len()
        );

        {
            let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
            cache.put(text.to_string(), embedding.clone());
        }

        Ok(embedding)
    }

    /// Clear the query cache
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        cache.clear();
    }

    /// Get cache statistics (size, capacity)
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap_or_else(|p| p.into_inner());
        (cache.len(), cache.cap().get())
    }
}

impl std::fmt::Debug for EmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingModel")
            .field("name", &self.spec.name)
            .field("kind", &self.backend.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{SentenceEncoder, TextTokenizer, TokenBatch, TokenEncoder};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// One token per whitespace-separated word, plus one padding slot.
    struct WordTokenizer;

    impl TextTokenizer for WordTokenizer {
        fn tokenize(&self, text: &str) -> Result<TokenBatch> {
            let words = text.split_whitespace().count();
            let mut ids: Vec<u32> = (1..=words as u32).collect();
            let mut mask = vec![1; words];
            ids.push(0);
            mask.push(0);
            Ok(TokenBatch {
                type_ids: vec![0; ids.len()],
                ids,
                attention_mask: mask,
            })
        }
    }

    /// Token embedding is [id, 1.0]; padding rows are large so leaks show up.
    struct IdEncoder {
        calls: Arc<AtomicUsize>,
    }

    impl TokenEncoder for IdEncoder {
        fn forward(&self, tokens: &TokenBatch) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(tokens
                .ids
                .iter()
                .map(|&id| {
                    if id == 0 {
                        vec![1000.0, 1000.0]
                    } else {
                        vec![id as f32, 1.0]
                    }
                })
                .collect())
        }
    }

    struct LengthEncoder;

    impl SentenceEncoder for LengthEncoder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 0.5])
        }
    }

    fn token_model(calls: Arc<AtomicUsize>) -> EmbeddingModel {
        EmbeddingModel::new(
            ModelSpec::token_based("test-bert"),
            ModelBackend::TokenBased {
                tokenizer: Box::new(WordTokenizer),
                model: Box::new(IdEncoder { calls }),
            },
            8,
        )
        .unwrap()
    }

    #[test]
    fn test_token_based_mean_pools_over_mask() {
        let model = token_model(Arc::new(AtomicUsize::new(0)));

        // ids 1, 2, 3 -> mean 2.0; padding row is excluded
        let embedding = model.embed("three word query").unwrap();
        assert_eq!(embedding, vec![2.0, 1.0]);
        assert_eq!(model.kind(), ModelKind::TokenBased);
    }

    #[test]
    fn test_direct_encode() {
        let model = EmbeddingModel::new(
            ModelSpec::direct_encode("test-mpnet"),
            ModelBackend::DirectEncode {
                model: Box::new(LengthEncoder),
            },
            8,
        )
        .unwrap();

        assert_eq!(model.embed("abcd").unwrap(), vec![4.0, 0.5]);
        assert_eq!(model.kind(), ModelKind::DirectEncode);
    }

    #[test]
    fn test_query_cache_hit_skips_inference() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = token_model(calls.clone());

        let first = model.embed("machine learning").unwrap();
        let second = model.embed("machine learning").unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.cache_stats(), (1, 8));

        model.clear_cache();
        assert_eq!(model.cache_stats().0, 0);
    }

    #[test]
    fn test_empty_text_rejected() {
        let model = token_model(Arc::new(AtomicUsize::new(0)));
        assert!(matches!(
            model.embed("   "),
            Err(EmbeddingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let result = EmbeddingModel::new(
            ModelSpec::direct_encode("test-mpnet"),
            ModelBackend::DirectEncode {
                model: Box::new(LengthEncoder),
            },
            0,
        );
        assert!(matches!(result, Err(EmbeddingError::ConfigError(_))));
    }
}
