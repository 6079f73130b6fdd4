//! Server configuration.

use std::time::Duration;

use coinconv_common::Currency;
use coinconv_exchanges::ExchangeConfig;
use coinconv_fx::{RateCacheConfig, ResolverConfig};

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Resolver configuration.
    pub resolver: ResolverConfig,
    /// Cache configuration.
    pub cache: RateCacheConfig,
    /// Exchange endpoints.
    pub exchanges: ExchangeConfig,
    /// How often expired cache records are swept.
    pub cache_sweep_interval: Duration,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            resolver: ResolverConfig::default(),
            cache: RateCacheConfig::default(),
            exchanges: ExchangeConfig::default(),
            cache_sweep_interval: Duration::from_secs(60),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset or unparseable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("LISTEN_PORT").and_then(|p| p.parse().ok()) {
            config.listen_port = port;
        }

        if let Some(secs) = lookup("CACHE_RETENTION_SECONDS").and_then(|s| s.parse().ok()) {
            config.cache.retention = Duration::from_secs(secs);
        }

        if let Some(list) = lookup("INTERMEDIARY_CURRENCIES") {
            config.resolver.intermediaries = parse_currency_list(&list);
        }

        if let Some(url) = lookup("BINANCE_URL") {
            config.exchanges.binance_url = url;
        }

        if let Some(url) = lookup("KUCOIN_URL") {
            config.exchanges.kucoin_url = url;
        }

        if let Some(secs) = lookup("EXCHANGE_TIMEOUT_SECONDS").and_then(|s| s.parse().ok()) {
            config.exchanges.request_timeout = Duration::from_secs(secs);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.cache.retention.is_zero() {
            return Err("Cache retention cannot be zero".to_string());
        }

        if self.cache_sweep_interval.is_zero() {
            return Err("Cache sweep interval cannot be zero".to_string());
        }

        self.exchanges.validate()
    }
}

/// Parse a comma separated currency list, keeping order and skipping blanks.
fn parse_currency_list(list: &str) -> Vec<Currency> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(Currency::new)
        .collect()
}
