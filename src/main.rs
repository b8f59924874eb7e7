// =============================================================================
// MarketLens — Stock Technical-Analysis API, Main Entry Point
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod config;
mod indicators;
mod market_data;
mod scanner;
mod types;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::market_data::YahooFinanceClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("MarketLens stock analysis API starting up");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let config_path =
        std::env::var("MARKETLENS_CONFIG").unwrap_or_else(|_| "marketlens.json".to_string());
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();

    info!(
        bind_addr = %config.bind_addr,
        watchlist = config.scan_symbols.len(),
        interval = %config.interval,
        "Configuration loaded"
    );

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let market = Arc::new(YahooFinanceClient::new());
    let state = Arc::new(AppState::new(config, market));

    // ── 4. Serve ─────────────────────────────────────────────────────────
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "HTTP server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
