// =============================================================================
// Recommendation Scorer — enriched bars in, one Summary out
// =============================================================================
//
// Inspects the trailing one or two enriched bars, accumulates a bounded
// integer score from three checks in fixed order (RSI, MACD, SMA20) and
// maps the total to BUY / HOLD / SELL.  The check order fixes the order of
// the human-readable `signals` list; it has no effect on the score itself.
//
// The weights and decision thresholds are deliberately named constants so
// the rule stays auditable and testable on its own.
// =============================================================================

use crate::types::{clean, finite_or_none, EnrichedBar, Recommendation, Summary};

use super::{AnalysisError, RSI_OVERBOUGHT, RSI_OVERSOLD};

/// Score contribution of an RSI threshold breach.
pub const RSI_WEIGHT: i32 = 2;
/// Score contribution of the MACD trend check.
pub const MACD_WEIGHT: i32 = 1;
/// Score contribution of the price-vs-SMA20 check.
pub const SMA_WEIGHT: i32 = 1;
/// Total score at or above which the verdict is BUY.
pub const BUY_THRESHOLD: i32 = 2;
/// Total score at or below which the verdict is SELL.
pub const SELL_THRESHOLD: i32 = -2;

pub const SIGNAL_RSI_OVERSOLD: &str = "RSI Oversold (Bullish)";
pub const SIGNAL_RSI_OVERBOUGHT: &str = "RSI Overbought (Bearish)";
pub const SIGNAL_MACD_BULLISH: &str = "MACD Bullish Trend";
pub const SIGNAL_MACD_BEARISH: &str = "MACD Bearish Trend";
pub const SIGNAL_ABOVE_SMA20: &str = "Price above SMA20";
pub const SIGNAL_BELOW_SMA20: &str = "Price below SMA20";

/// Summarize the most recent state of `enriched` into a recommendation.
///
/// Empty input is the typed `NoData` outcome.  A check whose inputs are
/// absent (warmup bars, normalized non-finite values) is skipped entirely
/// rather than counted as neutral-with-label.
pub fn summarize(symbol: &str, enriched: &[EnrichedBar]) -> Result<Summary, AnalysisError> {
    let last = enriched.last().ok_or(AnalysisError::NoData)?;
    let prev = if enriched.len() > 1 {
        &enriched[enriched.len() - 2]
    } else {
        last
    };

    let price = finite_or_none(last.close);
    let prev_close = finite_or_none(prev.close);
    let change = match (price, prev_close) {
        (Some(p), Some(pc)) => p - pc,
        _ => 0.0,
    };

    let rsi = clean(last.rsi);
    let macd = clean(last.macd);
    let macd_signal = clean(last.macd_signal);
    let sma_20 = clean(last.sma_20);

    let mut score = 0;
    let mut signals = Vec::new();

    // 1. RSI threshold breach.
    if let Some(rsi) = rsi {
        if rsi < RSI_OVERSOLD {
            score += RSI_WEIGHT;
            signals.push(SIGNAL_RSI_OVERSOLD.to_string());
        } else if rsi > RSI_OVERBOUGHT {
            score -= RSI_WEIGHT;
            signals.push(SIGNAL_RSI_OVERBOUGHT.to_string());
        }
    }

    // 2. MACD line vs signal line.
    if let (Some(m), Some(s)) = (macd, macd_signal) {
        if m > s {
            score += MACD_WEIGHT;
            signals.push(SIGNAL_MACD_BULLISH.to_string());
        } else {
            score -= MACD_WEIGHT;
            signals.push(SIGNAL_MACD_BEARISH.to_string());
        }
    }

    // 3. Price vs SMA20.
    if let (Some(p), Some(sma)) = (price, sma_20) {
        if p > sma {
            score += SMA_WEIGHT;
            signals.push(SIGNAL_ABOVE_SMA20.to_string());
        } else {
            score -= SMA_WEIGHT;
            signals.push(SIGNAL_BELOW_SMA20.to_string());
        }
    }

    let recommendation = if score >= BUY_THRESHOLD {
        Recommendation::Buy
    } else if score <= SELL_THRESHOLD {
        Recommendation::Sell
    } else {
        Recommendation::Hold
    };

    Ok(Summary {
        symbol: symbol.to_string(),
        price,
        change,
        rsi,
        macd,
        macd_signal,
        recommendation,
        signals,
    })
}
