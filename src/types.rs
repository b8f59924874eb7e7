// =============================================================================
// Shared types used across the MarketLens analysis service
// =============================================================================

use serde::{Deserialize, Serialize};

/// One sampling period's OHLCV snapshot, as delivered by the market data
/// provider. `time` is `YYYY-MM-DD` for daily bars and
/// `YYYY-MM-DD HH:MM:SS` for intraday bars; within a sequence the values
/// are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A `Bar` plus every derived indicator column.
///
/// Derived fields are `None` wherever the series does not yet have enough
/// history (e.g. `sma_20` for the first 19 bars) and never carry NaN or
/// infinity — the engine normalizes those to `None` before returning.
/// All fields serialize explicitly (`null` for absent values) so chart
/// consumers always see the full column set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    /// +1 upward MACD/signal cross at this bar, -1 downward cross, 0 otherwise.
    pub macd_cross: i32,
    /// +1 when RSI < 30 (oversold), -1 when RSI > 70 (overbought), 0 otherwise.
    pub rsi_signal: i32,
}

/// Final verdict of the recommendation scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::Hold
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Hold => write!(f, "HOLD"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// The scorer's output for one symbol at one point in time.
///
/// Snapshot fields are `Option<f64>` because the trailing bar may predate
/// an indicator's warmup window; anything non-finite is normalized to
/// `None` before it lands here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub symbol: String,
    pub price: Option<f64>,
    pub change: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub recommendation: Recommendation,
    pub signals: Vec<String>,
}

/// Map a float to `Some(v)` only when it is finite, so sentinel floats
/// never leak to consumers as `NaN`/`Infinity` JSON.
pub fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Flatten an optional float, dropping non-finite payloads.
pub fn clean(value: Option<f64>) -> Option<f64> {
    value.and_then(finite_or_none)
}
