//! Recommendation endpoints
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `POST /recommend` - Rank researchers for a topic
//! - `GET /health` - Startup report and what can be requested

use axum::{extract::State, response::Json, routing::get, routing::post, Router};
use resmatch_core::{LoadResult, MetricIdentifier, ModelIdentifier, RecommendationResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{AppState, HttpError};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/recommend", post(recommend))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Researcher Recommendation API!".to_string(),
    })
}

/// Request body for `POST /recommend`. Model and metric are display labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub topic: String,
    pub model: String,
    pub metric: String,
}

/// Rank researchers for a topic
///
/// Model inference blocks, so the engine call runs on the blocking pool.
/// Unknown labels and unloaded models come back as `{"error": ...}` with
/// status 200.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8000/recommend \
///   -H "Content-Type: application/json" \
///   -d '{"topic": "machine learning", "model": "MPNet", "metric": "Cosine Similarity"}'
/// ```
///
/// # Errors
///
/// - `MODEL_ERROR`: the model could not be built or failed during inference
async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<RecommendationResponse>, HttpError> {
    tracing::info!(
        "Recommend: topic='{}' model='{}' metric='{}'",
        payload.topic,
        payload.model,
        payload.metric
    );

    let engine = Arc::clone(&state.engine);
    let response = tokio::task::spawn_blocking(move || {
        engine.recommend(&payload.topic, &payload.model, &payload.metric)
    })
    .await??;

    Ok(Json(response))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when any startup source failed or was partial
    pub status: String,
    /// Models that have vectors and can be requested
    pub models: Vec<ModelIdentifier>,
    pub metrics: Vec<MetricIdentifier>,
    /// Model names materialized so far
    pub loaded_models: Vec<String>,
    pub sources: Vec<LoadResult>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = &state.engine;
    let report = engine.report();

    Json(HealthResponse {
        status: if report.is_fully_loaded() { "ok" } else { "degraded" }.to_string(),
        models: engine.available_models(),
        metrics: MetricIdentifier::ALL.to_vec(),
        loaded_models: engine.models().loaded_models(),
        sources: report.results.clone(),
    })
}
