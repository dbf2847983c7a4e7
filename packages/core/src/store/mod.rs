//! Startup-loaded stores
//!
//! - [`VectorStore`] - per-model partitions of researcher vectors
//! - [`MetadataStore`] - per-researcher faculty/department/center/topics
//! - [`load_stores`] - builds both from the configured sources
//!
//! Both stores are written once during startup and read-only afterwards.
//! Every source produces a [`LoadResult`]; a failing source degrades to an
//! empty or partial result and never aborts startup.

mod loader;
mod metadata;
mod tables;
mod vectors;

pub use loader::load_stores;
pub use metadata::{top_topics, CenterRow, MetadataEntry, MetadataStore, RosterRow, TopicRow};
pub use tables::{read_research_centers, read_roster, read_topics, SourceRows};
pub use vectors::{read_vector_source, Partition, VectorStore};

use crate::models::ModelIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a startup source feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "model", rename_all = "snake_case")]
pub enum SourceKind {
    Vectors(ModelIdentifier),
    ResearchCenters,
    Topics,
    Roster,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Vectors(id) => write!(f, "vectors[{}]", id),
            SourceKind::ResearchCenters => write!(f, "research_centers"),
            SourceKind::Topics => write!(f, "topics"),
            SourceKind::Roster => write!(f, "roster"),
        }
    }
}

/// Outcome of loading one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub kind: SourceKind,
    pub source: String,
    /// False when nothing could be used from the source
    pub loaded: bool,
    /// Rows or vectors accepted
    pub records: usize,
    /// Set when the source failed or was only partially usable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl LoadResult {
    pub fn loaded(kind: SourceKind, source: impl Into<String>, records: usize) -> Self {
        Self {
            kind,
            source: source.into(),
            loaded: true,
            records,
            warning: None,
        }
    }

    pub fn partial(
        kind: SourceKind,
        source: impl Into<String>,
        records: usize,
        warning: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            loaded: true,
            records,
            warning: Some(warning.into()),
        }
    }

    pub fn failed(kind: SourceKind, source: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            loaded: false,
            records: 0,
            warning: Some(warning.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.loaded || self.warning.is_some()
    }

    /// Emit the result through tracing
    pub fn log(&self) {
        match (&self.warning, self.loaded) {
            (None, _) => tracing::info!(
                "Loaded {} from {} ({} records)",
                self.kind,
                self.source,
                self.records
            ),
            (Some(warning), true) => tracing::warn!(
                "Partially loaded {} from {} ({} records): {}",
                self.kind,
                self.source,
                self.records,
                warning
            ),
            (Some(warning), false) => {
                tracing::warn!("Skipped {} from {}: {}", self.kind, self.source, warning)
            }
        }
    }
}

/// All load results from startup, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupReport {
    pub results: Vec<LoadResult>,
}

impl StartupReport {
    pub fn push(&mut self, result: LoadResult) {
        result.log();
        self.results.push(result);
    }

    pub fn degraded(&self) -> impl Iterator<Item = &LoadResult> {
        self.results.iter().filter(|r| r.is_degraded())
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.degraded().next().is_none()
    }

    pub fn vectors_loaded(&self, id: ModelIdentifier) -> bool {
        self.results
            .iter()
            .any(|r| r.kind == SourceKind::Vectors(id) && r.loaded)
    }
}
