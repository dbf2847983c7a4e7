//! ResMatch HTTP API
//!
//! A thin axum surface over [`RecommendationEngine`]. The engine is built once
//! at startup and shared by every handler through [`AppState`].
//!
//! # Endpoints
//!
//! - `recommend_endpoints`: `/`, `/recommend`, `/health`
//! - `directory_endpoints`: `/faculties`, `/faculty-data/:faculty`
//!
//! # Security
//!
//! - CORS restricted to a single configured origin
//! - No authentication

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use resmatch_core::{EngineConfig, RecommendationEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod directory_endpoints;
mod http_error;
mod provider;
mod recommend_endpoints;

pub use directory_endpoints::FacultiesResponse;
pub use http_error::HttpError;
pub use provider::{build_provider, UnavailableProvider};
pub use recommend_endpoints::{HealthResponse, RecommendRequest, WelcomeResponse};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Application state shared across all endpoints
///
/// The engine is read-only apart from its internal model cache, so no outer
/// lock is needed.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

/// Process settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allow_origin: String,
    /// Engine configuration file; defaults are used when unset
    pub engine_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_allow_origin: DEFAULT_CORS_ORIGIN.to_string(),
            engine_config: None,
        }
    }
}

impl ServerConfig {
    /// Read `RESMATCH_PORT`, `CORS_ALLOW_ORIGIN` and `RESMATCH_CONFIG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("RESMATCH_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            cors_allow_origin: lookup("CORS_ALLOW_ORIGIN")
                .filter(|origin| !origin.trim().is_empty())
                .unwrap_or(defaults.cors_allow_origin),
            engine_config: lookup("RESMATCH_CONFIG")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn load_engine_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.engine_config {
            Some(path) => Ok(EngineConfig::from_file(path)?),
            None => {
                tracing::info!("RESMATCH_CONFIG not set, using default engine configuration");
                Ok(EngineConfig::default())
            }
        }
    }
}

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    Ok(Router::new()
        .merge(recommend_endpoints::routes(state.clone()))
        .merge(directory_endpoints::routes(state))
        .layer(cors_layer(cors_origin)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS_ALLOW_ORIGIN '{}': {}", origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Bind and serve until the process is stopped
pub async fn start_server(engine: Arc<RecommendationEngine>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(AppState { engine }, &config.cors_allow_origin)?;

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("HTTP server starting on http://{}", addr);
    tracing::info!("CORS enabled for {}", config.cors_allow_origin);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
