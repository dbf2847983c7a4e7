//! Vector Store
//!
//! One partition per model identifier, each holding researcher vectors in
//! source order. Source order is the candidate order handed to ranking, and
//! ranking ties keep it.

use crate::error::Result;
use crate::models::{ModelIdentifier, ResearcherId};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Researcher vectors for one model, all of the same dimension
#[derive(Debug, Clone, Default)]
pub struct Partition {
    ids: Vec<ResearcherId>,
    vectors: Vec<Vec<f32>>,
    index: HashMap<ResearcherId, usize>,
    dimension: Option<usize>,
}

impl Partition {
    /// Build a partition from raw `(name, vector)` pairs.
    ///
    /// Names are trimmed. A duplicate name keeps its first position and takes
    /// the later vector. Vectors whose length differs from the first accepted
    /// vector are dropped. Returns the partition and the number of dropped
    /// vectors.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<f32>)>) -> (Self, usize) {
        let mut partition = Partition::default();
        let mut skipped = 0;

        for (raw_name, vector) in entries {
            let id = ResearcherId::new(&raw_name);
            if id.is_empty() {
                skipped += 1;
                continue;
            }

            match partition.dimension {
                None => partition.dimension = Some(vector.len()),
                Some(dimension) if dimension != vector.len() => {
                    tracing::debug!(
                        "Dropping vector for {}: length {} != {}",
                        id,
                        vector.len(),
                        dimension
                    );
                    skipped += 1;
                    continue;
                }
                Some(_) => {}
            }

            match partition.index.get(&id) {
                Some(&position) => partition.vectors[position] = vector,
                None => {
                    partition.index.insert(id.clone(), partition.ids.len());
                    partition.ids.push(id);
                    partition.vectors.push(vector);
                }
            }
        }

        (partition, skipped)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Shared vector length, `None` for an empty partition
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.index.get(id).map(|&i| self.vectors[i].as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Candidates in source order
    pub fn iter(&self) -> impl Iterator<Item = (&ResearcherId, &[f32])> {
        self.ids
            .iter()
            .zip(self.vectors.iter().map(|v| v.as_slice()))
    }

    pub fn ids(&self) -> &[ResearcherId] {
        &self.ids
    }
}

/// Partitions keyed by model identifier
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    partitions: HashMap<ModelIdentifier, Partition>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a partition. The first partition for an identifier wins; later
    /// inserts are ignored and return `false`.
    pub fn insert(&mut self, id: ModelIdentifier, partition: Partition) -> bool {
        if self.partitions.contains_key(&id) {
            tracing::warn!("Vector partition for {} already loaded, keeping the first", id);
            return false;
        }
        self.partitions.insert(id, partition);
        true
    }

    pub fn partition(&self, id: ModelIdentifier) -> Option<&Partition> {
        self.partitions.get(&id)
    }

    pub fn contains(&self, id: ModelIdentifier) -> bool {
        self.partitions.contains_key(&id)
    }

    /// Loaded identifiers, in declaration order
    pub fn loaded(&self) -> Vec<ModelIdentifier> {
        let mut ids: Vec<ModelIdentifier> = self.partitions.keys().copied().collect();
        ids.sort();
        ids
    }
}

/// `(name, vector)` pairs in file order
struct OrderedVectors(Vec<(String, Vec<f32>)>);

impl<'de> Deserialize<'de> for OrderedVectors {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVectorsVisitor;

        impl<'de> Visitor<'de> for OrderedVectorsVisitor {
            type Value = OrderedVectors;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of researcher name to embedding vector")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, vector)) = map.next_entry::<String, Vec<f32>>()? {
                    entries.push((name, vector));
                }
                Ok(OrderedVectors(entries))
            }
        }

        deserializer.deserialize_map(OrderedVectorsVisitor)
    }
}

/// Read a JSON `{ "<name>": [f32, ...], ... }` vector source, preserving key order.
///
/// An empty object is a valid source with no researchers.
pub fn read_vector_source(path: &Path) -> Result<Vec<(String, Vec<f32>)>> {
    let file = File::open(path)?;
    let OrderedVectors(entries) = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn entry(name: &str, vector: &[f32]) -> (String, Vec<f32>) {
        (name.to_string(), vector.to_vec())
    }

    #[test]
    fn test_partition_trims_and_keeps_order() {
        let (partition, skipped) = Partition::from_entries(vec![
            entry(" Carol ", &[0.0, 1.0]),
            entry("Alice\t", &[1.0, 0.0]),
            entry("Bob", &[0.5, 0.5]),
        ]);

        assert_eq!(skipped, 0);
        let names: Vec<&str> = partition.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
        assert_eq!(partition.get("Alice"), Some(&[1.0, 0.0][..]));
        assert_eq!(partition.dimension(), Some(2));
    }

    #[test]
    fn test_partition_duplicate_keeps_position_takes_last_vector() {
        let (partition, _) = Partition::from_entries(vec![
            entry("Alice", &[1.0, 0.0]),
            entry("Bob", &[0.0, 1.0]),
            entry(" Alice", &[0.3, 0.3]),
        ]);

        assert_eq!(partition.len(), 2);
        assert_eq!(partition.ids()[0].as_str(), "Alice");
        assert_eq!(partition.get("Alice"), Some(&[0.3, 0.3][..]));
    }

    #[test]
    fn test_partition_drops_mismatched_lengths_and_blank_names() {
        let (partition, skipped) = Partition::from_entries(vec![
            entry("Alice", &[1.0, 0.0, 0.0]),
            entry("Bob", &[1.0, 0.0]),
            entry("   ", &[1.0, 0.0, 0.0]),
            entry("Carol", &[0.0, 0.0, 1.0]),
        ]);

        assert_eq!(skipped, 2);
        assert_eq!(partition.len(), 2);
        assert!(partition.iter().all(|(_, v)| v.len() == 3));
        assert!(!partition.contains("Bob"));
    }

    #[test]
    fn test_store_first_insert_wins() {
        let mut store = VectorStore::new();
        let (first, _) = Partition::from_entries(vec![entry("Alice", &[1.0])]);
        let (second, _) = Partition::from_entries(vec![entry("Bob", &[1.0])]);

        assert!(store.insert(ModelIdentifier::Bert, first));
        assert!(!store.insert(ModelIdentifier::Bert, second));
        assert!(store.partition(ModelIdentifier::Bert).unwrap().contains("Alice"));
        assert_eq!(store.loaded(), vec![ModelIdentifier::Bert]);
    }

    #[test]
    fn test_read_vector_source_preserves_file_order() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("bert.json");
        std::fs::write(&path, r#"{"Zed": [1.0, 2.0], "Amy": [3.0, 4.0], "Mia ": [5.0, 6.0]}"#)
            .unwrap();

        let entries = read_vector_source(&path).unwrap();
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Mia "]);
    }

    #[test]
    fn test_read_vector_source_errors() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(read_vector_source(&missing), Err(EngineError::Io(_))));

        let malformed = temp_dir.path().join("bad.json");
        std::fs::write(&malformed, r#"{"Amy": "not a vector"}"#).unwrap();
        assert!(matches!(read_vector_source(&malformed), Err(EngineError::Json(_))));

        let not_a_map = temp_dir.path().join("list.json");
        std::fs::write(&not_a_map, "[[1.0, 2.0]]").unwrap();
        assert!(matches!(read_vector_source(&not_a_map), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_read_vector_source_accepts_empty_object() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let entries = read_vector_source(&path).unwrap();
        assert!(entries.is_empty());

        let (partition, skipped) = Partition::from_entries(entries);
        assert_eq!(skipped, 0);
        assert!(partition.is_empty());
        assert_eq!(partition.dimension(), None);
    }
}
