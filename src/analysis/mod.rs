// =============================================================================
// Analysis Core — Indicator Engine + Recommendation Scorer
// =============================================================================
//
// The two public operations of the service:
//
//   compute_indicators : &[Bar]         -> Vec<EnrichedBar>
//   summarize          : &[EnrichedBar] -> Summary
//
// Both are pure and stateless: no I/O, no logging, no shared mutable state.
// Calls are independent and safe to run concurrently on disjoint inputs.

pub mod engine;
pub mod scorer;

pub use engine::compute_indicators;
pub use scorer::summarize;

use thiserror::Error;

/// Errors surfaced by the analysis core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A bar violated a required-field or ordering invariant.  This is a
    /// contract violation by the caller, never masked or skipped.
    #[error("invalid bar data: {0}")]
    InvalidBarData(String),

    /// Empty input — an expected outcome, typed so callers can map it to
    /// a "no data" response instead of treating it as a failure.
    #[error("no data available")]
    NoData,
}

/// RSI below this level reads as oversold (bullish).
pub const RSI_OVERSOLD: f64 = 30.0;

/// RSI above this level reads as overbought (bearish).
pub const RSI_OVERBOUGHT: f64 = 70.0;
