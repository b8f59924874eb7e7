// =============================================================================
// Bollinger Bands
// =============================================================================
//
// A moving-average envelope scaled by trailing volatility:
//
//   middle = SMA(period)
//   upper  = middle + num_std * σ
//   lower  = middle - num_std * σ
//
// σ is the *population* standard deviation of the trailing window (divide
// by `period`, not `period - 1`).
// =============================================================================

use super::sma::sma;

/// The three Bollinger columns, each aligned with the input series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub lower: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
}

/// Compute Bollinger Bands for `values` over the given `period` with a
/// band width of `num_std` standard deviations.
///
/// # Edge cases
/// - `period == 0` or input shorter than `period` => all `None`
/// - A flat window collapses all three bands onto the mean (σ = 0).
pub fn bollinger_bands(values: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let n = values.len();
    let middle = sma(values, period);
    let mut lower = vec![None; n];
    let mut upper = vec![None; n];

    for i in 0..n {
        let Some(mean) = middle[i] else { continue };
        let window = &values[i + 1 - period..=i];
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let width = num_std * variance.sqrt();
        lower[i] = Some(mean - width);
        upper[i] = Some(mean + width);
    }

    BollingerSeries {
        lower,
        middle,
        upper,
    }
}
