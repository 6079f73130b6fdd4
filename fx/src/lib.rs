//! CoinConv FX Engine
//!
//! Resolves a conversion rate for a currency pair across several exchange
//! sources and prices an amount with it.
//!
//! # Features
//!
//! - Per-request cache staleness window over a store with fixed retention
//! - Preferred source, then fallback sources in registry order
//! - Two-hop rates through configured intermediary currencies
//! - Exact decimal arithmetic throughout
//!
//! # Example
//!
//! ```rust,ignore
//! use coinconv_fx::{ConversionRequest, RateCache, RateResolver, RateSourceRegistry, ResolverConfig};
//! use coinconv_common::SourceId;
//!
//! let registry = RateSourceRegistry::new().register(SourceId::Binance, binance);
//! let resolver = RateResolver::new(registry, RateCache::in_memory(), ResolverConfig::default());
//!
//! let request = ConversionRequest::new("BTC", "USDT", amount).with_cache_max_seconds(60);
//! let result = resolver.convert(&request).await?;
//! ```

pub mod cache;
pub mod conversion;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod source;

pub use cache::{MemoryRateStore, RateCache, RateCacheConfig, RateRecord, RateStore};
pub use conversion::{ConversionRequest, ConversionResult, RateOrigin};
pub use error::{FxError, FxResult};
pub use registry::RateSourceRegistry;
pub use resolver::{RateResolver, ResolverConfig};
pub use source::RateSource;

#[cfg(any(test, feature = "test-utils"))]
pub use source::MockRateSource;
