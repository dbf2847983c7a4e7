//! Similarity Engine
//!
//! Five pure scoring functions over embedding vectors, dispatched by
//! [`MetricIdentifier`], plus [`rank`] which orders a candidate set by score.
//!
//! | Metric | Transform | Score | Best first |
//! |---|---|---|---|
//! | Cosine Similarity | none | cosine ∈ [-1, 1] | highest |
//! | Minkowski | none | distance, p = 3 | lowest |
//! | Hamming | binarize (> 0) | 1 - fraction of differing bits | highest |
//! | Jaccard | binarize (> 0) | 1 - Jaccard distance | highest |
//! | Kullback-Leibler | L2-normalize, softmax | KL(query ‖ candidate) | lowest |
//!
//! All arithmetic is done in `f64`. Vectors of different length are scored
//! over their shared prefix.

use crate::models::{MetricIdentifier, ResearcherId, SortOrder};
use std::cmp::Ordering;

/// Order of the Minkowski distance
pub const MINKOWSKI_P: f64 = 3.0;

/// Cosine similarity; 0.0 when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

pub fn minkowski_distance(a: &[f32], b: &[f32], p: f64) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64 - y as f64).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Component > 0 maps to `true`
pub fn binarize(v: &[f32]) -> Vec<bool> {
    v.iter().map(|&x| x > 0.0).collect()
}

pub fn hamming_similarity(a: &[f32], b: &[f32]) -> f64 {
    hamming_bits(&binarize(a), &binarize(b))
}

pub fn jaccard_similarity(a: &[f32], b: &[f32]) -> f64 {
    jaccard_bits(&binarize(a), &binarize(b))
}

/// L2-normalize then softmax. The zero vector skips normalization.
pub fn softmax_normalized(v: &[f32]) -> Vec<f64> {
    let norm = v.iter().map(|&x| (x as f64).powi(2)).sum::<f64>().sqrt();
    let scaled: Vec<f64> = if norm > 0.0 {
        v.iter().map(|&x| x as f64 / norm).collect()
    } else {
        v.iter().map(|&x| x as f64).collect()
    };

    let max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scaled.iter().map(|&x| (x - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// KL divergence of the candidate distribution from the query distribution
pub fn kl_divergence(query: &[f32], candidate: &[f32]) -> f64 {
    kl_distributions(&softmax_normalized(query), &softmax_normalized(candidate))
}

fn hamming_bits(a: &[bool], b: &[bool]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 1.0;
    }
    let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
    1.0 - differing as f64 / n as f64
}

fn jaccard_bits(a: &[bool], b: &[bool]) -> f64 {
    let mut union = 0usize;
    let mut differing = 0usize;
    for (&x, &y) in a.iter().zip(b) {
        if x || y {
            union += 1;
            if x != y {
                differing += 1;
            }
        }
    }
    if union == 0 {
        return 1.0;
    }
    1.0 - differing as f64 / union as f64
}

fn kl_distributions(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .map(|(&pi, &qi)| if pi > 0.0 { pi * (pi / qi).ln() } else { 0.0 })
        .sum()
}

impl MetricIdentifier {
    /// Score `candidate` against `query` under this metric
    pub fn score(&self, query: &[f32], candidate: &[f32]) -> f64 {
        match self {
            MetricIdentifier::CosineSimilarity => cosine_similarity(query, candidate),
            MetricIdentifier::Minkowski => minkowski_distance(query, candidate, MINKOWSKI_P),
            MetricIdentifier::Hamming => hamming_similarity(query, candidate),
            MetricIdentifier::Jaccard => jaccard_similarity(query, candidate),
            MetricIdentifier::KullbackLeibler => kl_divergence(query, candidate),
        }
    }

    /// Ordering of two scores, best first. NaN ranks after every number.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self.order() {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
        }
    }
}

/// Query side of a metric, transformed once per ranking
enum PreparedQuery<'q> {
    Cosine(&'q [f32]),
    Minkowski(&'q [f32]),
    Hamming(Vec<bool>),
    Jaccard(Vec<bool>),
    KullbackLeibler(Vec<f64>),
}

impl<'q> PreparedQuery<'q> {
    fn new(metric: MetricIdentifier, query: &'q [f32]) -> Self {
        match metric {
            MetricIdentifier::CosineSimilarity => PreparedQuery::Cosine(query),
            MetricIdentifier::Minkowski => PreparedQuery::Minkowski(query),
            MetricIdentifier::Hamming => PreparedQuery::Hamming(binarize(query)),
            MetricIdentifier::Jaccard => PreparedQuery::Jaccard(binarize(query)),
            MetricIdentifier::KullbackLeibler => {
                PreparedQuery::KullbackLeibler(softmax_normalized(query))
            }
        }
    }

    fn score(&self, candidate: &[f32]) -> f64 {
        match self {
            PreparedQuery::Cosine(query) => cosine_similarity(query, candidate),
            PreparedQuery::Minkowski(query) => minkowski_distance(query, candidate, MINKOWSKI_P),
            PreparedQuery::Hamming(bits) => hamming_bits(bits, &binarize(candidate)),
            PreparedQuery::Jaccard(bits) => jaccard_bits(bits, &binarize(candidate)),
            PreparedQuery::KullbackLeibler(p) => kl_distributions(p, &softmax_normalized(candidate)),
        }
    }
}

/// Score every candidate and order best first.
///
/// The sort is stable: candidates with equal scores keep their input order.
/// Returns the full list; truncation is up to the caller.
pub fn rank<'a>(
    query: &[f32],
    candidates: impl IntoIterator<Item = (&'a ResearcherId, &'a [f32])>,
    metric: MetricIdentifier,
) -> Vec<(&'a ResearcherId, f64)> {
    let prepared = PreparedQuery::new(metric, query);
    let mut mismatched = 0usize;

    let mut scored: Vec<(&'a ResearcherId, f64)> = candidates
        .into_iter()
        .map(|(id, vector)| {
            if vector.len() != query.len() {
                mismatched += 1;
            }
            (id, prepared.score(vector))
        })
        .collect();

    if mismatched > 0 {
        tracing::warn!(
            "{} candidates differ in length from the {}-dimensional query; scored over the shared prefix",
            mismatched,
            query.len()
        );
    }

    scored.sort_by(|a, b| metric.compare(a.1, b.1));
    scored
}
