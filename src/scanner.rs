// =============================================================================
// Market Scanner — watchlist-wide BUY screening
// =============================================================================
//
// Runs the fetch → compute → summarize pipeline for every configured symbol
// concurrently and keeps only the BUY verdicts.  Each symbol is fully
// isolated: a fetch or analysis failure is logged and that symbol skipped,
// never propagated to the batch.  Result order follows the watchlist order.
// =============================================================================

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::analysis::{compute_indicators, summarize, AnalysisError};
use crate::app_state::AppState;
use crate::market_data::MarketDataProvider;
use crate::types::{Recommendation, Summary};

/// Scan the configured watchlist and return the BUY summaries, serving
/// from the TTL cache when a recent batch exists.
pub async fn run_scan(state: &Arc<AppState>) -> Vec<Summary> {
    if let Some(cached) = state.cached_scan() {
        debug!(results = cached.len(), "serving scan results from cache");
        return cached;
    }

    let results = scan_symbols(
        state.market.as_ref(),
        &state.config.scan_symbols,
        &state.config.analyze_range,
        &state.config.interval,
    )
    .await;

    state.store_scan(results.clone());
    results
}

/// Scan `symbols` against `provider`, returning BUY summaries in watchlist
/// order.
pub async fn scan_symbols(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
    range: &str,
    interval: &str,
) -> Vec<Summary> {
    let scans = symbols
        .iter()
        .map(|symbol| scan_one(provider, symbol, range, interval));
    let results: Vec<Summary> = join_all(scans).await.into_iter().flatten().collect();

    info!(
        scanned = symbols.len(),
        buys = results.len(),
        "market scan complete"
    );
    results
}

/// One symbol's pipeline. Returns `Some` only for a BUY verdict; every
/// failure mode degrades to `None` so the batch survives bad symbols.
async fn scan_one(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    range: &str,
    interval: &str,
) -> Option<Summary> {
    let bars = match provider.fetch_history(symbol, range, interval).await {
        Ok(bars) => bars,
        Err(e) => {
            warn!(symbol, error = %e, "scan fetch failed, skipping symbol");
            return None;
        }
    };

    let summary = compute_indicators(&bars)
        .and_then(|enriched| summarize(symbol, &enriched));
    match summary {
        Ok(summary) if summary.recommendation == Recommendation::Buy => Some(summary),
        Ok(_) => None,
        Err(AnalysisError::NoData) => {
            debug!(symbol, "no data, skipping symbol");
            None
        }
        Err(e) => {
            warn!(symbol, error = %e, "scan analysis failed, skipping symbol");
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    /// Provider serving canned per-symbol histories; unknown symbols fail.
    struct CannedProvider {
        histories: Vec<(String, Vec<Bar>)>,
    }

    #[async_trait]
    impl MarketDataProvider for CannedProvider {
        async fn fetch_history(
            &self,
            symbol: &str,
            _range: &str,
            _interval: &str,
        ) -> Result<Vec<Bar>> {
            self.histories
                .iter()
                .find(|(s, _)| s == symbol)
                .map(|(_, bars)| bars.clone())
                .ok_or_else(|| anyhow!("upstream fetch failed for {symbol}"))
        }

        async fn fetch_info(&self, _symbol: &str) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    fn bars_with_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                // Spread across months so day numbers stay valid dates.
                time: format!("2024-{:02}-{:02}", 3 + i / 28, i % 28 + 1),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 500.0,
            })
            .collect()
    }

    /// 30 bars sliding down then 10 rallying hard: the trailing bar sits
    /// above SMA20 and the MACD line has crossed back above its signal
    /// line, scoring +2 (BUY) while RSI stays just inside neutral.
    fn bullish_history() -> Vec<Bar> {
        let mut closes: Vec<f64> = (0..30).map(|i| 160.0 - 2.0 * i as f64).collect();
        closes.extend((1..=10).map(|i| 104.0 + 4.0 * i as f64));
        bars_with_closes(&closes)
    }

    /// Strictly rising closes: RSI pins at 100 (overbought, -2) which keeps
    /// the verdict away from BUY.
    fn overbought_history() -> Vec<Bar> {
        bars_with_closes(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>())
    }

    fn names(results: &[Summary]) -> Vec<&str> {
        results.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[tokio::test]
    async fn scan_keeps_only_buy_verdicts() {
        let provider = CannedProvider {
            histories: vec![
                ("UP".to_string(), bullish_history()),
                ("HOT".to_string(), overbought_history()),
            ],
        };
        let symbols = vec!["UP".to_string(), "HOT".to_string()];
        let results = scan_symbols(&provider, &symbols, "6mo", "1d").await;
        assert_eq!(names(&results), vec!["UP"]);
        assert_eq!(results[0].recommendation, Recommendation::Buy);
    }

    #[tokio::test]
    async fn scan_isolates_failing_symbols() {
        // MISSING errors out of the provider; EMPTY yields NoData.
        let provider = CannedProvider {
            histories: vec![
                ("UP".to_string(), bullish_history()),
                ("EMPTY".to_string(), Vec::new()),
            ],
        };
        let symbols = vec![
            "MISSING".to_string(),
            "EMPTY".to_string(),
            "UP".to_string(),
        ];
        let results = scan_symbols(&provider, &symbols, "6mo", "1d").await;
        assert_eq!(names(&results), vec!["UP"]);
    }

    #[tokio::test]
    async fn scan_preserves_watchlist_order() {
        let provider = CannedProvider {
            histories: vec![
                ("A".to_string(), bullish_history()),
                ("B".to_string(), bullish_history()),
                ("C".to_string(), bullish_history()),
            ],
        };
        let symbols = vec!["C".to_string(), "A".to_string(), "B".to_string()];
        let results = scan_symbols(&provider, &symbols, "6mo", "1d").await;
        assert_eq!(names(&results), vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn scan_empty_watchlist_is_empty() {
        let provider = CannedProvider {
            histories: Vec::new(),
        };
        let results = scan_symbols(&provider, &[], "6mo", "1d").await;
        assert!(results.is_empty());
    }
}
