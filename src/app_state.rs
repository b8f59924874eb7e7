// =============================================================================
// Shared Application State
// =============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::config::AppConfig;
use crate::market_data::MarketDataProvider;
use crate::types::Summary;

/// State shared by every request handler: the immutable configuration, the
/// upstream provider, and the TTL cache for scanner results.
///
/// The scan cache exists because one scan fans out a fetch per watchlist
/// symbol; dashboard polling would otherwise hammer the upstream provider.
pub struct AppState {
    pub config: AppConfig,
    pub market: Arc<dyn MarketDataProvider>,
    scan_cache: RwLock<Option<ScanCacheEntry>>,
}

struct ScanCacheEntry {
    at: Instant,
    results: Vec<Summary>,
}

impl AppState {
    pub fn new(config: AppConfig, market: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            config,
            market,
            scan_cache: RwLock::new(None),
        }
    }

    /// Return the cached scan results if they are still within the TTL.
    pub fn cached_scan(&self) -> Option<Vec<Summary>> {
        let ttl = Duration::from_secs(self.config.scan_cache_secs);
        if ttl.is_zero() {
            return None;
        }
        let guard = self.scan_cache.read();
        guard
            .as_ref()
            .filter(|entry| entry.at.elapsed() < ttl)
            .map(|entry| entry.results.clone())
    }

    /// Replace the cached scan results with a fresh batch.
    pub fn store_scan(&self, results: Vec<Summary>) {
        *self.scan_cache.write() = Some(ScanCacheEntry {
            at: Instant::now(),
            results,
        });
    }
}
