// =============================================================================
// Service Configuration
// =============================================================================
//
// Every tunable lives here: bind address, CORS origins, lookback defaults,
// and the scanner watchlist.  All fields carry `#[serde(default)]` so that
// adding new fields never breaks loading an older config file, and a
// missing file falls back to defaults at the call site.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_history_range() -> String {
    "2y".to_string()
}

fn default_analyze_range() -> String {
    "6mo".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_scan_cache_secs() -> u64 {
    600
}

fn default_scan_symbols() -> Vec<String> {
    [
        // US tech
        "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AMD",
        // Hong Kong
        "0700.HK", "9988.HK", "3690.HK", "1810.HK", "9618.HK", "1211.HK", "2318.HK",
        // A-shares (Shanghai)
        "600519.SS", "600036.SS", "601318.SS",
        // A-shares (Shenzhen)
        "000858.SZ", "002594.SZ", "300750.SZ",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Lookback range for the charting/history endpoint.
    #[serde(default = "default_history_range")]
    pub history_range: String,

    /// Lookback range for single-symbol analysis and the scanner. Shorter
    /// than the history range: the scorer only inspects the trailing bars.
    #[serde(default = "default_analyze_range")]
    pub analyze_range: String,

    /// Sampling interval for all fetches.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Watchlist scanned by `/api/scanner`.
    #[serde(default = "default_scan_symbols")]
    pub scan_symbols: Vec<String>,

    /// How long a scan result is served from cache before the watchlist is
    /// re-fetched. 0 disables caching.
    #[serde(default = "default_scan_cache_secs")]
    pub scan_cache_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        serde_json::from_str("{}").expect("default config must deserialize")
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment overrides: `MARKETLENS_SYMBOLS` (comma-separated)
    /// replaces the watchlist, `MARKETLENS_BIND` the bind address.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(syms) = std::env::var("MARKETLENS_SYMBOLS") {
            let parsed: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.scan_symbols = parsed;
            }
        }
        if let Ok(bind) = std::env::var("MARKETLENS_BIND") {
            if !bind.trim().is_empty() {
                self.bind_addr = bind.trim().to_string();
            }
        }
    }
}
