//! CoinConv Exchange Sources
//!
//! HTTP implementations of [`RateSource`] for the supported exchanges, and
//! the startup wiring that maps every [`SourceId`] to one of them.

pub mod binance;
pub mod config;
mod http;
pub mod kucoin;

use std::sync::Arc;

use coinconv_common::SourceId;
use coinconv_fx::{RateSource, RateSourceRegistry};

pub use binance::BinanceSource;
pub use config::ExchangeConfig;
pub use kucoin::KucoinSource;

/// Build the source implementing `id`.
pub fn source_for(id: SourceId, config: &ExchangeConfig) -> Arc<dyn RateSource> {
    match id {
        SourceId::Binance => Arc::new(BinanceSource::new(
            config.binance_url.clone(),
            config.request_timeout,
        )),
        SourceId::Kucoin => Arc::new(KucoinSource::new(
            config.kucoin_url.clone(),
            config.request_timeout,
        )),
    }
}

/// Build a registry holding every known source, in declared order.
pub fn build_registry(config: &ExchangeConfig) -> RateSourceRegistry {
    SourceId::ALL
        .into_iter()
        .fold(RateSourceRegistry::new(), |registry, id| {
            registry.register(id, source_for(id, config))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_source() {
        let registry = build_registry(&ExchangeConfig::default());

        let ids: Vec<SourceId> = registry.ids().collect();
        assert_eq!(ids, SourceId::ALL.to_vec());
        assert_eq!(registry.get(SourceId::Binance).unwrap().name(), "binance");
        assert_eq!(registry.get(SourceId::Kucoin).unwrap().name(), "kucoin");
    }
}
