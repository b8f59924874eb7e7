// =============================================================================
// Yahoo Finance Chart API Client
// =============================================================================
//
// Thin REST client over the public v8 chart endpoint:
//
//   GET /v8/finance/chart/{symbol}?range={range}&interval={interval}
//
// The response carries parallel arrays (timestamp + one quote block of
// open/high/low/close/volume arrays) with `null` holes for halted or
// partial sessions.  Normalization happens here: holes are dropped,
// timestamps are rendered as fixed-width strings, and the output is
// guaranteed strictly ascending — the engine never sees upstream noise.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::MarketDataProvider;
use crate::types::Bar;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance REST client. Unauthenticated; the chart endpoint is
/// public but rejects requests without a User-Agent header.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (used by tests to target a
    /// local mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("marketlens/1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_chart(&self, symbol: &str, range: &str, interval: &str) -> Result<ChartResult> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .with_context(|| format!("chart request for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("chart request for {symbol} returned {status}");
        }

        let body: ChartResponse = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;

        if let Some(err) = body.chart.error {
            anyhow::bail!("chart API error for {symbol}: {err}");
        }

        body.chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .with_context(|| format!("chart response for {symbol} has no result"))
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    #[instrument(skip(self), name = "yahoo::fetch_history")]
    async fn fetch_history(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<Bar>> {
        let chart = self.fetch_chart(symbol, range, interval).await?;
        let bars = bars_from_chart(&chart, interval);
        debug!(symbol, range, interval, bars = bars.len(), "history fetched");
        Ok(bars)
    }

    #[instrument(skip(self), name = "yahoo::fetch_info")]
    async fn fetch_info(&self, symbol: &str) -> Result<serde_json::Value> {
        let chart = self.fetch_chart(symbol, "1d", "1d").await?;
        Ok(chart.meta)
    }
}

// =============================================================================
// Response shape & normalization
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: serde_json::Value,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Flatten the parallel arrays into `Bar`s, dropping any row with a null
/// or non-positive price and any timestamp that does not advance.  Rows
/// with a null volume keep the bar with volume 0 (Yahoo omits volume for
/// some exchanges' daily bars).
fn bars_from_chart(chart: &ChartResult, interval: &str) -> Vec<Bar> {
    let Some(quote) = chart.indicators.quote.first() else {
        return Vec::new();
    };
    let intraday = is_intraday(interval);

    let mut bars: Vec<Bar> = Vec::with_capacity(chart.timestamp.len());
    for (i, &ts) in chart.timestamp.iter().enumerate() {
        let row = (
            price_at(&quote.open, i),
            price_at(&quote.high, i),
            price_at(&quote.low, i),
            price_at(&quote.close, i),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = row else {
            continue;
        };
        let Some(time) = format_bar_time(ts, intraday) else {
            continue;
        };
        if let Some(last) = bars.last() {
            if last.time >= time {
                continue;
            }
        }
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0);

        bars.push(Bar {
            time,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars
}

fn price_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column
        .get(i)
        .copied()
        .flatten()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Intraday intervals are minutes (`1m`..`90m`) or hours (`1h`); note
/// `1mo`/`3mo` end in `o`, not `m`.
fn is_intraday(interval: &str) -> bool {
    interval.ends_with('m') || interval.ends_with('h')
}

fn format_bar_time(ts: i64, intraday: bool) -> Option<String> {
    let dt = DateTime::from_timestamp(ts, 0)?;
    let fmt = if intraday {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d"
    };
    Some(dt.format(fmt).to_string())
}
