// =============================================================================
// Market Data — upstream price-history providers
// =============================================================================
//
// The provider owns every upstream quirk: HTTP transport, response-shape
// normalization, null-row dropping, timestamp formatting.  The analysis
// core only ever sees well-formed, chronologically ascending `Bar`
// sequences.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Bar;

/// Seam between the service and its upstream data source, so the scanner
/// and API layer are testable without the network.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch OHLCV history for `symbol` over a lookback `range` (e.g.
    /// `"6mo"`, `"2y"`) at a sampling `interval` (e.g. `"1d"`, `"1h"`).
    /// Bars come back ascending by time with upstream null rows dropped.
    async fn fetch_history(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<Bar>>;

    /// Fetch instrument metadata (exchange, currency, market price, ...)
    /// for `symbol`, as an opaque JSON object.
    async fn fetch_info(&self, symbol: &str) -> Result<serde_json::Value>;
}
