// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// analysis engine.  Every series function returns a vector *aligned with its
// input*: index `i` of the output describes index `i` of the input, and
// positions without enough trailing history hold `None`.  Callers never have
// to re-align truncated series against the bar sequence.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerSeries};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;
