// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Thin routing surface over the analysis core. Handlers fetch bars, call
// `compute_indicators` / `summarize`, and serialize the value objects
// verbatim; no analysis logic lives here.
//
// An upstream fetch failure on the single-symbol endpoints degrades to an
// empty bar sequence (logged), which surfaces as the NoData outcome rather
// than a 5xx.
//
// CORS is configured permissively for development; tighten the origins in
// production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::analysis::{compute_indicators, summarize, AnalysisError};
use crate::app_state::AppState;
use crate::scanner::run_scan;
use crate::types::{EnrichedBar, Summary};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/stock/:symbol", get(stock_history))
        .route("/api/stock/:symbol/analyze", get(stock_analysis))
        .route("/api/stock/:symbol/info", get(stock_info))
        .route("/api/scanner", get(scan_market))
        .layer(cors)
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

// =============================================================================
// Root & health (public liveness probes)
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "MarketLens stock analysis API is running" }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// =============================================================================
// Single-symbol history with indicators
// =============================================================================

#[derive(Debug, Deserialize)]
struct HistoryParams {
    range: Option<String>,
    interval: Option<String>,
}

#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    data: Vec<EnrichedBar>,
}

async fn stock_history(
    Path(symbol): Path<String>,
    Query(params): Query<HistoryParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let range = params
        .range
        .unwrap_or_else(|| state.config.history_range.clone());
    let interval = params
        .interval
        .unwrap_or_else(|| state.config.interval.clone());

    let bars = match state.market.fetch_history(&symbol, &range, &interval).await {
        Ok(bars) => bars,
        Err(e) => {
            warn!(symbol, error = %e, "history fetch failed, serving empty series");
            Vec::new()
        }
    };

    match compute_indicators(&bars) {
        Ok(data) => Json(HistoryResponse { symbol, data }).into_response(),
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

// =============================================================================
// Single-symbol analysis summary
// =============================================================================

async fn stock_analysis(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let range = &state.config.analyze_range;
    let interval = &state.config.interval;

    let bars = match state.market.fetch_history(&symbol, range, interval).await {
        Ok(bars) => bars,
        Err(e) => {
            warn!(symbol, error = %e, "analysis fetch failed, treating as no data");
            Vec::new()
        }
    };

    let summary: Result<Summary, AnalysisError> =
        compute_indicators(&bars).and_then(|enriched| summarize(&symbol, &enriched));

    match summary {
        Ok(summary) => Json(summary).into_response(),
        Err(AnalysisError::NoData) => {
            error_response(StatusCode::NOT_FOUND, format!("no data for {symbol}"))
        }
        Err(e) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

// =============================================================================
// Instrument metadata
// =============================================================================

async fn stock_info(Path(symbol): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    match state.market.fetch_info(&symbol).await {
        Ok(info) => Json(json!({ "symbol": symbol, "info": info })).into_response(),
        Err(e) => {
            warn!(symbol, error = %e, "info fetch failed");
            error_response(StatusCode::BAD_GATEWAY, format!("info fetch failed for {symbol}"))
        }
    }
}

// =============================================================================
// Market scanner
// =============================================================================

#[derive(Serialize)]
struct ScanResponse {
    results: Vec<Summary>,
}

async fn scan_market(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let results = run_scan(&state).await;
    Json(ScanResponse { results })
}
