//! Business Services
//!
//! - `similarity` - metric functions and candidate ranking
//! - `RecommendationEngine` - model resolution, query embedding, ranking and
//!   metadata join
//!
//! Services read the startup-loaded stores and never mutate them.

pub mod recommendation;
pub mod similarity;

pub use recommendation::RecommendationEngine;
pub use similarity::{
    binarize, cosine_similarity, hamming_similarity, jaccard_similarity, kl_divergence,
    minkowski_distance, rank, softmax_normalized, MINKOWSKI_P,
};
