//! Shared fixtures for core integration tests
//!
//! A three-researcher data directory plus a keyword-driven model provider,
//! so no test ever loads a real model.

#![allow(dead_code)]

use anyhow::Result;
use resmatch_core::{EngineConfig, RecommendationEngine};
use resmatch_nlp_engine::{
    EmbeddingError, ModelBackend, ModelKind, ModelProvider, ModelSpec, SentenceEncoder,
    TextTokenizer, TokenBatch, TokenEncoder,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Maps a topic to a 3-d vector: [computing, life science, other]
fn keyword_vector(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    if text.contains("machine") || text.contains("learning") {
        vec![1.0, 0.0, 0.0]
    } else if text.contains("biology") || text.contains("genetics") {
        vec![0.0, 1.0, 0.0]
    } else {
        vec![0.3, 0.3, 0.3]
    }
}

struct KeywordEncoder;

impl SentenceEncoder for KeywordEncoder {
    fn encode(&self, text: &str) -> resmatch_nlp_engine::Result<Vec<f32>> {
        Ok(keyword_vector(text))
    }
}

/// One token per word: 0 = computing, 1 = life science, 2 = anything else
struct KeywordTokenizer;

impl TextTokenizer for KeywordTokenizer {
    fn tokenize(&self, text: &str) -> resmatch_nlp_engine::Result<TokenBatch> {
        let ids: Vec<u32> = text
            .split_whitespace()
            .map(|word| match keyword_vector(word).as_slice() {
                [x, _, _] if *x == 1.0 => 0,
                [_, y, _] if *y == 1.0 => 1,
                _ => 2,
            })
            .collect();
        Ok(TokenBatch {
            attention_mask: vec![1; ids.len()],
            type_ids: vec![0; ids.len()],
            ids,
        })
    }
}

/// One-hot token embeddings over the three keyword classes
struct OneHotEncoder;

impl TokenEncoder for OneHotEncoder {
    fn forward(&self, tokens: &TokenBatch) -> resmatch_nlp_engine::Result<Vec<Vec<f32>>> {
        Ok(tokens
            .ids
            .iter()
            .map(|&id| {
                let mut v = vec![0.0; 3];
                v[id as usize] = 1.0;
                v
            })
            .collect())
    }
}

/// Provider that counts constructions and can be told to fail for some names
#[derive(Default)]
pub struct KeywordProvider {
    loads: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl KeywordProvider {
    pub fn fail_for(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn recover(&self, name: &str) {
        self.failing.lock().unwrap().remove(name);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelProvider for KeywordProvider {
    fn load(&self, spec: &ModelSpec) -> resmatch_nlp_engine::Result<ModelBackend> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&spec.name) {
            return Err(EmbeddingError::ModelLoadError(format!(
                "{} is unavailable",
                spec.name
            )));
        }
        Ok(match spec.kind {
            ModelKind::DirectEncode => ModelBackend::DirectEncode {
                model: Box::new(KeywordEncoder),
            },
            ModelKind::TokenBased => ModelBackend::TokenBased {
                tokenizer: Box::new(KeywordTokenizer),
                model: Box::new(OneHotEncoder),
            },
        })
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

pub const MPNET_VECTORS: &str = r#"{
    " Alice Rahman ": [0.9, 0.1, 0.0],
    "Budi Santoso": [0.1, 0.9, 0.0],
    "Citra Lestari\t": [0.5, 0.5, 0.1]
}"#;

pub const BERT_VECTORS: &str = r#"{
    "Alice Rahman": [0.8, 0.2, 0.1],
    "Budi Santoso": [0.0, 1.0, 0.0],
    "Citra Lestari": [0.4, 0.4, 0.4]
}"#;

pub const ROSTER: &str = "\
Nama Dosen,Fakultas,Departemen
Alice Rahman ,Fakultas Sains,Ilmu Komputer
Budi Santoso,Fakultas Sains,Biologi
Citra Lestari,Fakultas Teknik,Teknik Elektro
";

pub const RESEARCH_CENTERS: &str = "\
name,research_center
Alice Rahman,Pusat Kecerdasan Artifisial
Budi Santoso,Pusat Bioteknologi
Citra Lestari,Pusat Energi
";

pub const TOPICS: &str = "\
author,topic,weight
Alice Rahman,Deep Learning,0.4
Alice Rahman,Computer Vision,0.3
Alice Rahman,Optimization,0.2
Alice Rahman,Graph Theory,0.06
Alice Rahman,Ethics,0.04
Budi Santoso,Genetics,0.7
Budi Santoso,Ecology,0.3
Citra Lestari,Power Systems,0.5
Citra Lestari,Signal Processing,0.5
";

fn write(dir: &Path, relative: &str, contents: &str) -> Result<()> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Write the three-researcher fixture under `dir` (MPNet and BERT vectors only)
pub fn write_fixture(dir: &Path) -> Result<()> {
    write(dir, "embeddings/mpnet.json", MPNET_VECTORS)?;
    write(dir, "embeddings/bert.json", BERT_VECTORS)?;
    write(dir, "metadata/roster.csv", ROSTER)?;
    write(dir, "metadata/research_centers.csv", RESEARCH_CENTERS)?;
    write(dir, "metadata/topics.csv", TOPICS)?;
    Ok(())
}

/// Default configuration rooted at `dir`
pub fn fixture_config(dir: &Path) -> EngineConfig {
    EngineConfig {
        data_dir: dir.to_path_buf(),
        ..EngineConfig::default()
    }
}

pub struct TestEnv {
    pub engine: RecommendationEngine,
    pub provider: Arc<KeywordProvider>,
    pub dir: TempDir,
}

/// Engine over the fixture with the default configuration
pub fn create_test_env() -> Result<TestEnv> {
    let dir = TempDir::new()?;
    write_fixture(dir.path())?;
    let provider = Arc::new(KeywordProvider::default());
    let engine = RecommendationEngine::load(fixture_config(dir.path()), provider.clone())?;
    Ok(TestEnv {
        engine,
        provider,
        dir,
    })
}
