// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// A trend-momentum oscillator built from two EMAs of the closing price:
//
//   macd      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the macd line
//   histogram = macd - signal
//
// The signal line is seeded the same way as any other EMA here — with the
// SMA of the first `signal_period` macd values — so for the standard
// 12/26/9 stack the macd line starts at index 25 and the signal line at
// index 33.
// =============================================================================

use super::ema::ema;

/// The three MACD columns, each aligned with the input series.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Compute the MACD stack for `values`.
///
/// Every output position is `None` until all of its constituents exist:
/// the macd line needs the slow EMA, the signal line additionally needs
/// `signal_period` macd values, and the histogram needs both.
///
/// # Edge cases
/// - Any zero period, or input shorter than the slow window => the
///   affected columns are all `None` (never an error).
pub fn macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let n = values.len();
    let fast = ema(values, fast_period);
    let slow = ema(values, slow_period);

    let mut macd_line = vec![None; n];
    for i in 0..n {
        if let (Some(f), Some(s)) = (fast[i], slow[i]) {
            macd_line[i] = Some(f - s);
        }
    }

    let signal = ema_over_sparse(&macd_line, signal_period);

    let mut histogram = vec![None; n];
    for i in 0..n {
        if let (Some(m), Some(s)) = (macd_line[i], signal[i]) {
            histogram[i] = Some(m - s);
        }
    }

    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}

/// EMA over a series with a leading `None` prefix (the macd line).
///
/// The populated suffix is contiguous by construction, so the EMA runs on
/// the compacted values and is re-padded back to the original indices.
fn ema_over_sparse(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let Some(first_valid) = values.iter().position(Option::is_some) else {
        return out;
    };

    let compact: Vec<f64> = values[first_valid..].iter().filter_map(|v| *v).collect();
    for (offset, value) in ema(&compact, period).into_iter().enumerate() {
        out[first_valid + offset] = value;
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let series = macd(&[], 12, 26, 9);
        assert!(series.macd.is_empty());
        assert!(series.signal.is_empty());
        assert!(series.histogram.is_empty());
    }

    #[test]
    fn macd_insufficient_data_is_all_none() {
        let values: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let series = macd(&values, 12, 26, 9);
        assert!(series.macd.iter().all(Option::is_none));
        assert!(series.signal.iter().all(Option::is_none));
        assert!(series.histogram.iter().all(Option::is_none));
    }

    #[test]
    fn macd_standard_stack_alignment() {
        // 12/26/9: macd starts at index 25, signal and histogram at 33.
        let values: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let series = macd(&values, 12, 26, 9);

        assert_eq!(series.macd.iter().position(Option::is_some), Some(25));
        assert_eq!(series.signal.iter().position(Option::is_some), Some(33));
        assert_eq!(series.histogram.iter().position(Option::is_some), Some(33));
        assert!(series.macd[25..].iter().all(Option::is_some));
        assert!(series.signal[33..].iter().all(Option::is_some));
    }

    #[test]
    fn macd_line_is_fast_minus_slow() {
        let values: Vec<f64> = (1..=40).map(|x| (x as f64).sin() * 10.0 + 100.0).collect();
        let series = macd(&values, 12, 26, 9);
        let fast = ema(&values, 12);
        let slow = ema(&values, 26);
        for i in 25..40 {
            let expected = fast[i].unwrap() - slow[i].unwrap();
            assert!((series.macd[i].unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn macd_histogram_is_macd_minus_signal() {
        let values: Vec<f64> = (1..=50).map(|x| 100.0 + (x as f64) * 0.5).collect();
        let series = macd(&values, 12, 26, 9);
        for i in 33..50 {
            let expected = series.macd[i].unwrap() - series.signal[i].unwrap();
            assert!((series.histogram[i].unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let series = macd(&[100.0; 40], 12, 26, 9);
        for v in series.macd.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
        for v in series.signal.iter().flatten() {
            assert!(v.abs() < 1e-10);
        }
    }

    #[test]
    fn macd_signal_seed_is_mean_of_first_nine_macd_values() {
        let values: Vec<f64> = (1..=40).map(|x| (x as f64) * (x as f64) * 0.1).collect();
        let series = macd(&values, 12, 26, 9);
        let seed: f64 = series.macd[25..34].iter().flatten().sum::<f64>() / 9.0;
        assert!((series.signal[33].unwrap() - seed).abs() < 1e-10);
    }

    #[test]
    fn ema_over_sparse_all_none() {
        let series = ema_over_sparse(&[None, None, None], 2);
        assert_eq!(series, vec![None, None, None]);
    }
}
