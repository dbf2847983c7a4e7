//! Model and metric selectors
//!
//! Both enums parse from the display labels clients send (`"MPNet"`,
//! `"Cosine Similarity"`, ...) so string comparison happens once at the
//! request boundary.

use resmatch_nlp_engine::{ModelKind, ModelSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects an embedding model and its vector-store partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelIdentifier {
    #[serde(rename = "BERT")]
    Bert,
    #[serde(rename = "DistilBERT")]
    DistilBert,
    #[serde(rename = "Albert")]
    Albert,
    #[serde(rename = "XLNet")]
    XlNet,
    #[serde(rename = "MPNet")]
    MpNet,
}

impl ModelIdentifier {
    pub const ALL: [ModelIdentifier; 5] = [
        ModelIdentifier::Bert,
        ModelIdentifier::DistilBert,
        ModelIdentifier::Albert,
        ModelIdentifier::XlNet,
        ModelIdentifier::MpNet,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ModelIdentifier::Bert => "BERT",
            ModelIdentifier::DistilBert => "DistilBERT",
            ModelIdentifier::Albert => "Albert",
            ModelIdentifier::XlNet => "XLNet",
            ModelIdentifier::MpNet => "MPNet",
        }
    }

    /// Case-insensitive parse of a display label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.label().eq_ignore_ascii_case(label))
    }

    /// Model name and kind used when no explicit configuration is given
    pub fn default_spec(&self) -> ModelSpec {
        match self {
            ModelIdentifier::Bert => ModelSpec::new("bert-base-uncased", ModelKind::TokenBased),
            ModelIdentifier::DistilBert => {
                ModelSpec::new("distilbert-base-uncased", ModelKind::TokenBased)
            }
            ModelIdentifier::Albert => ModelSpec::new("albert-base-v2", ModelKind::TokenBased),
            ModelIdentifier::XlNet => ModelSpec::new("xlnet-base-cased", ModelKind::TokenBased),
            ModelIdentifier::MpNet => ModelSpec::new(
                "sentence-transformers/all-mpnet-base-v2",
                ModelKind::DirectEncode,
            ),
        }
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction in which scores rank from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Higher score = more similar
    Descending,
    /// Lower score = more similar
    Ascending,
}

/// Selects the ranking function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricIdentifier {
    #[serde(rename = "Cosine Similarity")]
    CosineSimilarity,
    #[serde(rename = "Minkowski")]
    Minkowski,
    #[serde(rename = "Hamming")]
    Hamming,
    #[serde(rename = "Jaccard")]
    Jaccard,
    #[serde(rename = "Kullback-Leibler")]
    KullbackLeibler,
}

impl MetricIdentifier {
    pub const ALL: [MetricIdentifier; 5] = [
        MetricIdentifier::CosineSimilarity,
        MetricIdentifier::Minkowski,
        MetricIdentifier::Hamming,
        MetricIdentifier::Jaccard,
        MetricIdentifier::KullbackLeibler,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricIdentifier::CosineSimilarity => "Cosine Similarity",
            MetricIdentifier::Minkowski => "Minkowski",
            MetricIdentifier::Hamming => "Hamming",
            MetricIdentifier::Jaccard => "Jaccard",
            MetricIdentifier::KullbackLeibler => "Kullback-Leibler",
        }
    }

    /// Case-insensitive parse of a display label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.label().eq_ignore_ascii_case(label))
    }

    pub fn order(&self) -> SortOrder {
        match self {
            MetricIdentifier::CosineSimilarity
            | MetricIdentifier::Hamming
            | MetricIdentifier::Jaccard => SortOrder::Descending,
            MetricIdentifier::Minkowski | MetricIdentifier::KullbackLeibler => {
                SortOrder::Ascending
            }
        }
    }
}

impl fmt::Display for MetricIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_labels_round_trip() {
        for id in ModelIdentifier::ALL {
            assert_eq!(ModelIdentifier::from_label(id.label()), Some(id));
        }
        assert_eq!(ModelIdentifier::from_label(" mpnet "), Some(ModelIdentifier::MpNet));
        assert_eq!(ModelIdentifier::from_label("GPT"), None);
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(
            MetricIdentifier::from_label("cosine similarity"),
            Some(MetricIdentifier::CosineSimilarity)
        );
        assert_eq!(
            MetricIdentifier::from_label("Kullback-Leibler"),
            Some(MetricIdentifier::KullbackLeibler)
        );
        assert_eq!(MetricIdentifier::from_label("Euclidean"), None);
    }

    #[test]
    fn test_sort_orders() {
        assert_eq!(MetricIdentifier::CosineSimilarity.order(), SortOrder::Descending);
        assert_eq!(MetricIdentifier::Hamming.order(), SortOrder::Descending);
        assert_eq!(MetricIdentifier::Jaccard.order(), SortOrder::Descending);
        assert_eq!(MetricIdentifier::Minkowski.order(), SortOrder::Ascending);
        assert_eq!(MetricIdentifier::KullbackLeibler.order(), SortOrder::Ascending);
    }

    #[test]
    fn test_default_specs() {
        assert_eq!(
            ModelIdentifier::MpNet.default_spec().kind,
            ModelKind::DirectEncode
        );
        assert_eq!(
            ModelIdentifier::Bert.default_spec().name,
            "bert-base-uncased"
        );
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&MetricIdentifier::KullbackLeibler).unwrap();
        assert_eq!(json, "\"Kullback-Leibler\"");
        let id: ModelIdentifier = serde_json::from_str("\"DistilBERT\"").unwrap();
        assert_eq!(id, ModelIdentifier::DistilBert);
    }
}
