//! ONNX model provider using Candle.
//!
//! Each model lives in `<models_dir>/<sanitized model name>/` with:
//! - `tokenizer.json` (HuggingFace tokenizers format)
//! - `model.onnx` (transformer export)
//!
//! Token-based models read the first graph output as `[1, seq_len, hidden]`
//! token embeddings. Direct-encode models must expose a `sentence_embedding`
//! output of shape `[1, hidden]`.

use crate::config::{ModelKind, ModelSpec, ProviderConfig};
use crate::error::{EmbeddingError, Result};
use crate::provider::{
    ModelBackend, ModelProvider, SentenceEncoder, TextTokenizer, TokenBatch, TokenEncoder,
};
use candle_core::{DType, Device, Tensor};
use candle_onnx::onnx::ModelProto;
use std::collections::HashMap;
use std::path::Path;
use tokenizers::Tokenizer;

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "model.onnx";
const SENTENCE_EMBEDDING_OUTPUT: &str = "sentence_embedding";

/// Provider that loads ONNX exports from a local model directory
#[derive(Debug, Clone)]
pub struct OnnxModelProvider {
    config: ProviderConfig,
}

impl OnnxModelProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate().map_err(EmbeddingError::ConfigError)?;
        Ok(Self { config })
    }

    fn load_tokenizer(&self, dir: &Path) -> Result<HfTokenizer> {
        let path = dir.join(TOKENIZER_FILE);
        if !path.exists() {
            return Err(EmbeddingError::ModelNotFound(path.display().to_string()));
        }

        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            EmbeddingError::ModelLoadError(format!(
                "Tokenizer load failed at {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(HfTokenizer {
            tokenizer,
            max_tokens: self.config.max_sequence_length,
        })
    }

    fn load_graph(&self, dir: &Path) -> Result<OnnxGraph> {
        let path = dir.join(MODEL_FILE);
        if !path.exists() {
            return Err(EmbeddingError::ModelNotFound(path.display().to_string()));
        }

        let model = candle_onnx::read_file(&path)
            .map_err(|e| EmbeddingError::ModelLoadError(format!("ONNX load failed: {}", e)))?;
        let graph = model.graph.as_ref().ok_or_else(|| {
            EmbeddingError::ModelLoadError(format!("{} has no graph", path.display()))
        })?;

        let input_names = graph.input.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = graph.output.iter().map(|o| o.name.clone()).collect();
        if output_names.is_empty() {
            return Err(EmbeddingError::ModelLoadError(format!(
                "{} declares no outputs",
                path.display()
            )));
        }

        Ok(OnnxGraph {
            model,
            input_names,
            output_names,
            device: Device::Cpu,
        })
    }
}

impl ModelProvider for OnnxModelProvider {
    fn load(&self, spec: &ModelSpec) -> Result<ModelBackend> {
        let dir = self.config.resolve_model_dir(&spec.name).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EmbeddingError::ModelNotFound(e.to_string())
            } else {
                EmbeddingError::IoError(e)
            }
        })?;
        tracing::info!("Model directory for {} resolved to {:?}", spec.name, dir);

        let tokenizer = self.load_tokenizer(&dir)?;
        let graph = self.load_graph(&dir)?;

        match spec.kind {
            ModelKind::TokenBased => {
                let output = graph.output_names[0].clone();
                Ok(ModelBackend::TokenBased {
                    tokenizer: Box::new(tokenizer),
                    model: Box::new(OnnxTokenEncoder { graph, output }),
                })
            }
            ModelKind::DirectEncode => {
                if !graph
                    .output_names
                    .iter()
                    .any(|name| name == SENTENCE_EMBEDDING_OUTPUT)
                {
                    return Err(EmbeddingError::ModelLoadError(format!(
                        "{} has no '{}' output; export it with pooling or register it as token_based",
                        spec.name, SENTENCE_EMBEDDING_OUTPUT
                    )));
                }
                Ok(ModelBackend::DirectEncode {
                    model: Box::new(OnnxSentenceEncoder { tokenizer, graph }),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Single-text tokenizer; one input never needs padding.
struct HfTokenizer {
    tokenizer: Tokenizer,
    max_tokens: usize,
}

impl TextTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenBatch> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::TokenizationError(e.to_string()))?;

        let mut tokens = TokenBatch {
            ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
        };
        tokens.truncate(self.max_tokens);
        Ok(tokens)
    }
}

struct OnnxGraph {
    model: ModelProto,
    input_names: Vec<String>,
    output_names: Vec<String>,
    device: Device,
}

impl OnnxGraph {
    fn run(&self, tokens: &TokenBatch, output: &str) -> Result<Tensor> {
        let seq_len = tokens.len();
        let mut inputs = HashMap::new();

        for name in &self.input_names {
            let values = match name.as_str() {
                "input_ids" => &tokens.ids,
                "attention_mask" => &tokens.attention_mask,
                "token_type_ids" => &tokens.type_ids,
                _ => continue,
            };
            // ONNX transformer exports take int64 inputs
            let data: Vec<i64> = values.iter().map(|&v| v as i64).collect();
            let tensor = Tensor::from_slice(&data, (1, seq_len), &self.device)
                .map_err(|e| EmbeddingError::InferenceError(format!("Input {}: {}", name, e)))?;
            inputs.insert(name.clone(), tensor);
        }

        let mut outputs = candle_onnx::simple_eval(&self.model, inputs)
            .map_err(|e| EmbeddingError::InferenceError(format!("Forward pass failed: {}", e)))?;

        outputs
            .remove(output)
            .ok_or_else(|| EmbeddingError::InferenceError(format!("Missing output '{}'", output)))
    }
}

struct OnnxTokenEncoder {
    graph: OnnxGraph,
    output: String,
}

impl TokenEncoder for OnnxTokenEncoder {
    fn forward(&self, tokens: &TokenBatch) -> Result<Vec<Vec<f32>>> {
        let hidden = self.graph.run(tokens, &self.output)?;
        hidden
            .squeeze(0)
            .and_then(|t| t.to_dtype(DType::F32))
            .and_then(|t| t.to_vec2::<f32>())
            .map_err(|e| EmbeddingError::InferenceError(format!("Token embeddings: {}", e)))
    }
}

struct OnnxSentenceEncoder {
    tokenizer: HfTokenizer,
    graph: OnnxGraph,
}

impl SentenceEncoder for OnnxSentenceEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let tokens = self.tokenizer.tokenize(text)?;
        let pooled = self.graph.run(&tokens, SENTENCE_EMBEDDING_OUTPUT)?;
        tensor_to_vec(&pooled)
    }
}

fn tensor_to_vec(tensor: &Tensor) -> Result<Vec<f32>> {
    tensor
        .to_dtype(DType::F32)
        .and_then(|t| t.flatten_all())
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| EmbeddingError::InferenceError(format!("Tensor to_vec1 failed: {}", e)))
}
