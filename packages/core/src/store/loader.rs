//! Startup loading of every configured source

use super::metadata::MetadataStore;
use super::tables::{read_research_centers, read_roster, read_topics, SourceRows};
use super::vectors::{read_vector_source, Partition, VectorStore};
use super::{LoadResult, SourceKind, StartupReport};
use crate::config::EngineConfig;
use crate::error::Result;
use std::path::Path;
use std::time::Instant;

/// Build both stores from `config`.
///
/// Never fails: each source that cannot be read degrades to an empty or
/// partial result, recorded in the returned report.
pub fn load_stores(config: &EngineConfig) -> (VectorStore, MetadataStore, StartupReport) {
    let start = Instant::now();
    let mut report = StartupReport::default();

    let mut vectors = VectorStore::new();
    for entry in &config.models {
        let kind = SourceKind::Vectors(entry.id);
        let path = config.resolve(&entry.vectors);
        let source = path.display().to_string();

        match read_vector_source(&path) {
            Ok(raw) => {
                let (partition, skipped) = Partition::from_entries(raw);
                let records = partition.len();
                if vectors.insert(entry.id, partition) {
                    report.push(if skipped > 0 {
                        LoadResult::partial(
                            kind,
                            source,
                            records,
                            format!("skipped {} vectors with a blank name or mismatched length", skipped),
                        )
                    } else {
                        LoadResult::loaded(kind, source, records)
                    });
                }
            }
            Err(e) => report.push(LoadResult::failed(kind, source, e.to_string())),
        }
    }

    let mut metadata = MetadataStore::new();
    for path in &config.metadata.rosters {
        let path = config.resolve(path);
        load_table(&mut report, SourceKind::Roster, &path, read_roster, |rows| {
            metadata.apply_roster(rows)
        });
    }

    if let Some(path) = &config.metadata.research_centers {
        let path = config.resolve(path);
        load_table(
            &mut report,
            SourceKind::ResearchCenters,
            &path,
            read_research_centers,
            |rows| metadata.apply_research_centers(rows),
        );
    }

    if let Some(path) = &config.metadata.topics {
        let path = config.resolve(path);
        load_table(&mut report, SourceKind::Topics, &path, read_topics, |rows| {
            metadata.apply_topics(rows, config.top_topics)
        });
    }

    tracing::info!(
        "Startup loading finished in {:?}: {} vector partitions, {} researchers with metadata, {} degraded sources",
        start.elapsed(),
        vectors.loaded().len(),
        metadata.len(),
        report.degraded().count()
    );

    (vectors, metadata, report)
}

fn load_table<T>(
    report: &mut StartupReport,
    kind: SourceKind,
    path: &Path,
    read: impl FnOnce(&Path) -> Result<SourceRows<T>>,
    apply: impl FnOnce(Vec<T>) -> usize,
) {
    let source = path.display().to_string();
    let result = match read(path) {
        Ok(SourceRows { rows, skipped }) => {
            let records = apply(rows);
            if skipped > 0 {
                LoadResult::partial(kind, source, records, format!("skipped {} malformed rows", skipped))
            } else {
                LoadResult::loaded(kind, source, records)
            }
        }
        Err(e) => LoadResult::failed(kind, source, e.to_string()),
    };
    report.push(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MetadataSources, ModelEntry};
    use crate::models::ModelIdentifier;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_missing_sources_degrade() {
        let dir = TempDir::new().unwrap();
        let config = EngineConfig {
            data_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };

        let (vectors, metadata, report) = load_stores(&config);
        assert!(vectors.loaded().is_empty());
        assert!(metadata.is_empty());
        // five vector sources, one roster, centers, topics
        assert_eq!(report.results.len(), 8);
        assert!(report.results.iter().all(|r| !r.loaded && r.warning.is_some()));
        assert!(!report.is_fully_loaded());
    }

    #[test]
    fn test_partial_vector_source() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("bert.json"),
            r#"{" Alice ": [1.0, 0.0], "Bob": [0.0, 1.0, 0.0], "Carol": [0.5, 0.5]}"#,
        )
        .unwrap();

        let config = EngineConfig {
            data_dir: dir.path().to_path_buf(),
            models: vec![ModelEntry {
                vectors: PathBuf::from("bert.json"),
                ..ModelEntry::with_defaults(ModelIdentifier::Bert)
            }],
            metadata: MetadataSources {
                research_centers: None,
                topics: None,
                rosters: Vec::new(),
            },
            ..EngineConfig::default()
        };

        let (vectors, _, report) = load_stores(&config);
        let partition = vectors.partition(ModelIdentifier::Bert).unwrap();
        assert_eq!(partition.len(), 2);
        assert!(partition.contains("Alice"));
        assert_eq!(report.results.len(), 1);
        assert!(report.results[0].loaded);
        assert_eq!(report.results[0].records, 2);
        assert!(report.results[0].warning.is_some());
        assert!(report.vectors_loaded(ModelIdentifier::Bert));
    }
}
