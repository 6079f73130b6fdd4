//! Shared application state.

use std::sync::Arc;

use coinconv_fx::{MemoryRateStore, RateCache, RateResolver, RateSourceRegistry};

use crate::config::ServerConfig;
use crate::metrics::{Metrics, SharedMetrics};

/// State shared by every request handler.
pub struct AppState {
    /// The conversion engine.
    pub resolver: RateResolver,
    /// Backing store of the resolver's cache.
    pub store: Arc<MemoryRateStore>,
    /// Service metrics.
    pub metrics: SharedMetrics,
}

impl AppState {
    /// Wire a resolver over `registry` with an in-memory cache store.
    pub fn new(config: &ServerConfig, registry: RateSourceRegistry) -> Self {
        let store = Arc::new(MemoryRateStore::new());
        let cache = RateCache::new(store.clone(), config.cache.clone());

        Self {
            resolver: RateResolver::new(registry, cache, config.resolver.clone()),
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Build state with the HTTP exchange sources from `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config, coinconv_exchanges::build_registry(&config.exchanges))
    }
}
