//! School Registry Service
//!
//! HTTP service that admits schools under a 50 m separation rule and lists
//! them by distance from a query point.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use school_registry::config::DEFAULT_LOG_FILTER;
use school_registry::{server, store, SchoolRegistry, ServiceConfig};

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();

    info!("🏫 School Registry v{}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::from_env()?;

    // Storage must be reachable before we accept requests
    let store = store::open_store(&config.storage)
        .await
        .context("failed to initialize school storage")?;

    let registry = Arc::new(SchoolRegistry::new(store));
    server::run_server(&config, registry).await
}
