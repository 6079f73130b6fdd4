//! Rate caching with storage-level retention and per-request staleness.
//!
//! Two independent clocks are involved:
//!
//! - the *retention TTL* is fixed configuration and is reset by every
//!   [`RateCache::save`]; when it elapses the record disappears from the store;
//! - the *staleness window* is supplied per request to [`RateCache::load`] and
//!   is checked against the timestamp stored inside the record.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use coinconv_common::{is_within, CurrencyPair, EpochSeconds, Rate, SourceId};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Record persisted per currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Decimal rate, kept as a string to avoid any float round trip.
    pub rate: String,
    /// Epoch seconds at which the rate was fetched.
    pub timestamp: EpochSeconds,
    /// Source identifier, wire form.
    pub source: String,
}

impl RateRecord {
    fn from_rate(rate: &Rate) -> Self {
        Self {
            rate: rate.value.to_string(),
            timestamp: rate.timestamp,
            source: rate.source.to_string(),
        }
    }

    fn decode(&self) -> FxResult<Rate> {
        let value: Decimal = self
            .rate
            .parse()
            .map_err(|e| FxError::Store(format!("bad rate {:?}: {}", self.rate, e)))?;
        let source: SourceId = self.source.parse()?;
        Ok(Rate::new(value, source, self.timestamp))
    }
}

/// Keyed record store with write-time retention.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Write or overwrite `key`, expiring it `retention` after this call.
    async fn put(&self, key: &str, record: RateRecord, retention: Duration) -> FxResult<()>;

    /// Read `key` if present and not yet expired.
    async fn get(&self, key: &str) -> FxResult<Option<RateRecord>>;
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: RateRecord,
    /// `None` when the retention overflows the clock.
    expires_at: Option<Instant>,
}

impl StoredRecord {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// In-process [`RateStore`] backed by a concurrent map.
///
/// Expiry is passive: a dead record is dropped when read, or in bulk by
/// [`evict_expired`](Self::evict_expired).
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    records: DashMap<String, StoredRecord>,
}

impl MemoryRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every expired record, returning how many went.
    pub fn evict_expired(&self) -> usize {
        let before = self.records.len();
        self.records.retain(|_, stored| stored.is_live());
        before.saturating_sub(self.records.len())
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn put(&self, key: &str, record: RateRecord, retention: Duration) -> FxResult<()> {
        let stored = StoredRecord {
            record,
            expires_at: Instant::now().checked_add(retention),
        };
        self.records.insert(key.to_string(), stored);
        Ok(())
    }

    async fn get(&self, key: &str) -> FxResult<Option<RateRecord>> {
        if let Some(stored) = self.records.get(key) {
            if stored.is_live() {
                return Ok(Some(stored.record.clone()));
            }
        }
        // Re-checked under the write lock so a concurrent put survives.
        self.records.remove_if(key, |_, stored| !stored.is_live());
        Ok(None)
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// Storage retention applied on every write.
    pub retention: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(3600),
        }
    }
}

/// Last-known rate per currency pair.
pub struct RateCache {
    store: Arc<dyn RateStore>,
    config: RateCacheConfig,
}

impl RateCache {
    /// Create a cache over an in-memory store with default configuration.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryRateStore::new()), RateCacheConfig::default())
    }

    /// Create a cache over the given store.
    pub fn new(store: Arc<dyn RateStore>, config: RateCacheConfig) -> Self {
        Self { store, config }
    }

    /// Store a freshly fetched rate, overwriting any previous record.
    ///
    /// Store failures are logged and swallowed.
    pub async fn save(&self, pair: &CurrencyPair, rate: &Rate) {
        let key = Self::cache_key(pair);
        let record = RateRecord::from_rate(rate);

        match self.store.put(&key, record, self.config.retention).await {
            Ok(()) => debug!(pair = %pair, source = %rate.source, "Cached rate"),
            Err(e) => warn!(pair = %pair, error = %e, "Failed to cache rate"),
        }
    }

    /// Load the cached rate for `pair` if it is at most `max_age_seconds` old.
    pub async fn load(&self, pair: &CurrencyPair, max_age_seconds: u64) -> Option<Rate> {
        let key = Self::cache_key(pair);

        let record = match self.store.get(&key).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(pair = %pair, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "Failed to read cached rate");
                return None;
            }
        };

        let rate = match record.decode() {
            Ok(rate) => rate,
            Err(e) => {
                warn!(pair = %pair, error = %e, "Ignoring undecodable cache record");
                return None;
            }
        };

        if !is_within(rate.timestamp, max_age_seconds) {
            debug!(pair = %pair, timestamp = rate.timestamp, max_age_seconds, "Cache entry stale");
            return None;
        }

        debug!(pair = %pair, "Cache hit");
        Some(rate)
    }

    fn cache_key(pair: &CurrencyPair) -> String {
        format!("conversion:{}:{}", pair.from.code(), pair.to.code())
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::in_memory()
    }
}
