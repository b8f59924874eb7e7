// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an instrument is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive values.
// Step 2 — Seed average gain / average loss with the plain mean of the first
//          `period` gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When the window contains no losses at all (avg_loss == 0) the ratio is
// undefined and RSI is pinned to 100.
// =============================================================================

/// Compute the RSI series for `values` with the given look-back `period`,
/// aligned with the input.
///
/// The first value lands at index `period` — one delta per period is
/// needed, and deltas start at index 1.  Everything earlier is `None`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `values.len() <= period` => all `None` (not enough deltas)
/// - `avg_loss == 0` => RSI = 100.0 at that index
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let period_f = period as f64;

    // Seed averages with the plain mean of the first `period` deltas.
    let (mut avg_gain, mut avg_loss) = (0.0_f64, 0.0_f64);
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss += delta.abs();
        }
    }
    avg_gain /= period_f;
    avg_loss /= period_f;
    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    // Wilder's smoothing for the rest of the series.
    for i in period + 1..values.len() {
        let delta = values[i] - values[i - 1];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
