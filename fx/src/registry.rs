//! Static mapping from source identifiers to rate sources.

use std::sync::Arc;

use coinconv_common::SourceId;

use crate::error::{FxError, FxResult};
use crate::source::RateSource;

/// Ordered registry of the rate sources available to the resolver.
///
/// Built once at startup. Registration order is the fallback order.
#[derive(Clone, Default)]
pub struct RateSourceRegistry {
    sources: Vec<(SourceId, Arc<dyn RateSource>)>,
}

impl RateSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source. Re-registering an id replaces it in place.
    pub fn register(mut self, id: SourceId, source: Arc<dyn RateSource>) -> Self {
        match self.sources.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = source,
            None => self.sources.push((id, source)),
        }
        self
    }

    /// Look up the source registered for `id`.
    pub fn get(&self, id: SourceId) -> FxResult<&Arc<dyn RateSource>> {
        self.sources
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, source)| source)
            .ok_or_else(|| FxError::UnsupportedSource(id.to_string()))
    }

    /// Registered ids in fallback order.
    pub fn ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources.iter().map(|(id, _)| *id)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if no source is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for RateSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockRateSource;

    #[test]
    fn test_registration_order_is_kept() {
        let registry = RateSourceRegistry::new()
            .register(SourceId::Kucoin, Arc::new(MockRateSource::new("kucoin")))
            .register(SourceId::Binance, Arc::new(MockRateSource::new("binance")));

        let ids: Vec<SourceId> = registry.ids().collect();
        assert_eq!(ids, vec![SourceId::Kucoin, SourceId::Binance]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let registry = RateSourceRegistry::new()
            .register(SourceId::Binance, Arc::new(MockRateSource::new("first")))
            .register(SourceId::Kucoin, Arc::new(MockRateSource::new("kucoin")))
            .register(SourceId::Binance, Arc::new(MockRateSource::new("second")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().next(), Some(SourceId::Binance));
        assert_eq!(registry.get(SourceId::Binance).unwrap().name(), "second");
    }

    #[test]
    fn test_unregistered_source_is_unsupported() {
        let registry = RateSourceRegistry::new()
            .register(SourceId::Binance, Arc::new(MockRateSource::new("binance")));

        let result = registry.get(SourceId::Kucoin);

        assert!(matches!(result, Err(FxError::UnsupportedSource(ref id)) if id == "kucoin"));
    }
}
