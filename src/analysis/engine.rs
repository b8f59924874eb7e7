// =============================================================================
// Indicator Engine — ordered bars in, enriched bars out
// =============================================================================
//
// Derives every indicator column over the full close-price series and
// appends the discrete crossover / threshold signals:
//
//   SMA 5/10/20, EMA 12/26, MACD(12,26,9), RSI(14), Bollinger(20, 2σ)
//   macd_cross ∈ {-1, 0, 1}, rsi_signal ∈ {-1, 0, 1}
//
// Input bars are validated up front (finite positive prices, non-negative
// volume, strictly increasing time); a malformed bar is a contract
// violation and fails the whole call — bad rows are never skipped.
// =============================================================================

use crate::indicators::{bollinger_bands, ema, macd, rsi, sma};
use crate::types::{clean, Bar, EnrichedBar};

use super::{AnalysisError, RSI_OVERBOUGHT, RSI_OVERSOLD};

const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const RSI_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_STD: f64 = 2.0;

/// Compute the full indicator set over `bars`.
///
/// Empty input yields an empty output. Every derived column in the result
/// is `None` until its warmup window is satisfied and never holds a
/// non-finite value.
pub fn compute_indicators(bars: &[Bar]) -> Result<Vec<EnrichedBar>, AnalysisError> {
    if bars.is_empty() {
        return Ok(Vec::new());
    }
    validate_bars(bars)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let sma_5 = sma(&closes, 5);
    let sma_10 = sma(&closes, 10);
    let sma_20 = sma(&closes, 20);
    let ema_12 = ema(&closes, MACD_FAST);
    let ema_26 = ema(&closes, MACD_SLOW);
    let macd_series = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let rsi_series = rsi(&closes, RSI_PERIOD);
    let bands = bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_STD);
    let crosses = detect_crosses(&macd_series.macd, &macd_series.signal);

    let enriched = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| EnrichedBar {
            time: bar.time.clone(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            sma_5: clean(sma_5[i]),
            sma_10: clean(sma_10[i]),
            sma_20: clean(sma_20[i]),
            ema_12: clean(ema_12[i]),
            ema_26: clean(ema_26[i]),
            macd: clean(macd_series.macd[i]),
            macd_signal: clean(macd_series.signal[i]),
            macd_hist: clean(macd_series.histogram[i]),
            rsi: clean(rsi_series[i]),
            bb_lower: clean(bands.lower[i]),
            bb_middle: clean(bands.middle[i]),
            bb_upper: clean(bands.upper[i]),
            macd_cross: crosses[i],
            rsi_signal: rsi_threshold_signal(rsi_series[i]),
        })
        .collect();

    Ok(enriched)
}

/// Check every bar's required-field and ordering invariants.
///
/// `time` strings are fixed-width zero-padded (`YYYY-MM-DD`, optionally
/// with `HH:MM:SS`), so lexicographic comparison is chronological
/// comparison.
fn validate_bars(bars: &[Bar]) -> Result<(), AnalysisError> {
    for (i, bar) in bars.iter().enumerate() {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::InvalidBarData(format!(
                    "bar {i} ({}): {field} must be a finite positive number, got {value}",
                    bar.time
                )));
            }
        }
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(AnalysisError::InvalidBarData(format!(
                "bar {i} ({}): volume must be finite and non-negative, got {}",
                bar.time, bar.volume
            )));
        }
        if i > 0 && bars[i - 1].time >= bar.time {
            return Err(AnalysisError::InvalidBarData(format!(
                "bar {i}: time {:?} is not after previous bar {:?}",
                bar.time,
                bars[i - 1].time
            )));
        }
    }
    Ok(())
}

/// Detect MACD/signal crossovers between consecutive points.
///
/// +1 when the macd line closes above the signal line after being at or
/// below it on the previous bar; -1 for the symmetric downward cross.
/// Any `None` among the four inputs reads as non-crossing (0), as does
/// index 0.
fn detect_crosses(macd_line: &[Option<f64>], signal_line: &[Option<f64>]) -> Vec<i32> {
    let mut out = vec![0; macd_line.len()];
    for i in 1..macd_line.len() {
        let (Some(m), Some(s), Some(pm), Some(ps)) = (
            macd_line[i],
            signal_line[i],
            macd_line[i - 1],
            signal_line[i - 1],
        ) else {
            continue;
        };
        if m > s && pm <= ps {
            out[i] = 1;
        } else if m < s && pm >= ps {
            out[i] = -1;
        }
    }
    out
}

/// Threshold signal for one RSI value: +1 oversold, -1 overbought, else 0.
fn rsi_threshold_signal(value: Option<f64>) -> i32 {
    match value {
        Some(v) if v < RSI_OVERSOLD => 1,
        Some(v) if v > RSI_OVERBOUGHT => -1,
        _ => 0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: daily bar with the given close; time derived from the index,
    /// spread across months so day numbers stay valid dates.
    fn bar(i: usize, close: f64) -> Bar {
        Bar {
            time: format!("2024-{:02}-{:02}", 1 + i / 28, i % 28 + 1),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000.0,
        }
    }

    fn ascending_bars(n: usize) -> Vec<Bar> {
        (0..n).map(|i| bar(i, 100.0 + i as f64)).collect()
    }

    // ---- empty / warmup behaviour ----------------------------------------

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(compute_indicators(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn warmup_nulls_per_column() {
        let enriched = compute_indicators(&ascending_bars(40)).unwrap();

        let first_some = |f: fn(&EnrichedBar) -> Option<f64>| {
            enriched.iter().position(|b| f(b).is_some())
        };

        assert_eq!(first_some(|b| b.sma_5), Some(4));
        assert_eq!(first_some(|b| b.sma_10), Some(9));
        assert_eq!(first_some(|b| b.sma_20), Some(19));
        assert_eq!(first_some(|b| b.ema_12), Some(11));
        assert_eq!(first_some(|b| b.ema_26), Some(25));
        assert_eq!(first_some(|b| b.macd), Some(25));
        assert_eq!(first_some(|b| b.macd_signal), Some(33));
        assert_eq!(first_some(|b| b.macd_hist), Some(33));
        assert_eq!(first_some(|b| b.rsi), Some(14));
        assert_eq!(first_some(|b| b.bb_middle), Some(19));
        assert_eq!(first_some(|b| b.bb_lower), Some(19));
        assert_eq!(first_some(|b| b.bb_upper), Some(19));
    }

    #[test]
    fn bar_fields_pass_through_untouched() {
        let bars = ascending_bars(5);
        let enriched = compute_indicators(&bars).unwrap();
        assert_eq!(enriched.len(), 5);
        for (raw, rich) in bars.iter().zip(enriched.iter()) {
            assert_eq!(raw.time, rich.time);
            assert_eq!(raw.close, rich.close);
            assert_eq!(raw.volume, rich.volume);
        }
    }

    #[test]
    fn idempotent_over_same_input() {
        let bars = ascending_bars(40);
        let first = compute_indicators(&bars).unwrap();
        let second = compute_indicators(&bars).unwrap();
        assert_eq!(first, second);
    }

    // ---- signal columns ---------------------------------------------------

    #[test]
    fn rsi_signal_overbought_on_rally() {
        // A strictly rising series pins RSI at 100 => overbought (-1) once
        // RSI exists, 0 during warmup.
        let enriched = compute_indicators(&ascending_bars(20)).unwrap();
        for b in &enriched[..14] {
            assert_eq!(b.rsi_signal, 0);
        }
        for b in &enriched[14..] {
            assert_eq!(b.rsi_signal, -1);
        }
    }

    #[test]
    fn rsi_threshold_signal_boundaries() {
        assert_eq!(rsi_threshold_signal(Some(29.9)), 1);
        assert_eq!(rsi_threshold_signal(Some(30.0)), 0);
        assert_eq!(rsi_threshold_signal(Some(70.0)), 0);
        assert_eq!(rsi_threshold_signal(Some(70.1)), -1);
        assert_eq!(rsi_threshold_signal(None), 0);
    }

    #[test]
    fn detect_crosses_upward_and_downward() {
        let macd_line = vec![Some(-1.0), Some(0.5), Some(0.5), Some(-0.5)];
        let signal_line = vec![Some(0.0), Some(0.0), Some(0.0), Some(0.0)];
        let crosses = detect_crosses(&macd_line, &signal_line);
        assert_eq!(crosses, vec![0, 1, 0, -1]);
    }

    #[test]
    fn detect_crosses_touch_then_break_counts() {
        // Equality on the previous bar still arms the cross.
        let macd_line = vec![Some(0.0), Some(1.0)];
        let signal_line = vec![Some(0.0), Some(0.0)];
        assert_eq!(detect_crosses(&macd_line, &signal_line), vec![0, 1]);
    }

    #[test]
    fn detect_crosses_null_inputs_never_trigger() {
        let macd_line = vec![None, Some(1.0), Some(-1.0)];
        let signal_line = vec![Some(0.0), Some(0.0), None];
        assert_eq!(detect_crosses(&macd_line, &signal_line), vec![0, 0, 0]);
    }

    #[test]
    fn macd_cross_zero_during_warmup() {
        let enriched = compute_indicators(&ascending_bars(40)).unwrap();
        // Signal line only exists from index 33; no cross can fire before 34.
        for b in &enriched[..34] {
            assert_eq!(b.macd_cross, 0);
        }
    }

    // ---- validation -------------------------------------------------------

    #[test]
    fn non_finite_close_is_invalid() {
        let mut bars = ascending_bars(5);
        bars[2].close = f64::NAN;
        let err = compute_indicators(&bars).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBarData(_)));
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn zero_price_is_invalid() {
        let mut bars = ascending_bars(5);
        bars[0].low = 0.0;
        assert!(matches!(
            compute_indicators(&bars),
            Err(AnalysisError::InvalidBarData(_))
        ));
    }

    #[test]
    fn negative_volume_is_invalid() {
        let mut bars = ascending_bars(5);
        bars[4].volume = -1.0;
        assert!(matches!(
            compute_indicators(&bars),
            Err(AnalysisError::InvalidBarData(_))
        ));
    }

    #[test]
    fn non_monotonic_time_is_invalid() {
        let mut bars = ascending_bars(5);
        bars[3].time = bars[1].time.clone();
        let err = compute_indicators(&bars).unwrap_err();
        assert!(err.to_string().contains("not after"));
    }

    #[test]
    fn duplicate_time_is_invalid() {
        let mut bars = ascending_bars(3);
        bars[1].time = bars[0].time.clone();
        assert!(compute_indicators(&bars).is_err());
    }
}
