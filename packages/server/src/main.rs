//! ResMatch HTTP Server Binary
//!
//! Loads every configured vector and metadata source, then serves the
//! recommendation API.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: port 8000, ./data, CORS for http://localhost:3000
//! cargo run -p resmatch-server --features embedding-service
//!
//! # Custom engine configuration and port
//! RESMATCH_CONFIG=resmatch.json RESMATCH_PORT=9000 cargo run -p resmatch-server
//! ```
//!
//! # Environment Variables
//!
//! - `RESMATCH_CONFIG`: Engine configuration JSON (default: built-in defaults)
//! - `RESMATCH_PORT`: Server port (default: 8000)
//! - `CORS_ALLOW_ORIGIN`: Allowed browser origin (default: http://localhost:3000)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::sync::Arc;

use resmatch_core::RecommendationEngine;
use resmatch_server::{build_provider, start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("ResMatch Researcher Recommendation API");

    let server_config = ServerConfig::from_env();
    let engine_config = server_config.load_engine_config()?;
    tracing::info!("Data directory: {}", engine_config.data_dir.display());

    let provider = build_provider(&engine_config.provider)?;

    // Startup loading reads every source synchronously
    let engine = tokio::task::spawn_blocking(move || {
        RecommendationEngine::load(engine_config, provider)
    })
    .await??;

    let degraded = engine.report().degraded().count();
    if degraded > 0 {
        tracing::warn!("{} sources degraded at startup, details on GET /health", degraded);
    }

    start_server(Arc::new(engine), &server_config).await
}
