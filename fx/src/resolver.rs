//! Rate resolution: cache, preferred source, fallbacks, then one intermediary hop.

use std::sync::Arc;

use coinconv_common::{now, Currency, CurrencyPair, Rate, SourceId};
use tracing::{debug, info, instrument, warn};

use crate::cache::RateCache;
use crate::conversion::{ConversionRequest, ConversionResult, RateOrigin};
use crate::error::{FxError, FxResult};
use crate::registry::RateSourceRegistry;
use crate::source::RateSource;

/// Configuration for the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Currencies tried as the middle leg of a two-hop conversion, in order.
    pub intermediaries: Vec<Currency>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            intermediaries: ["USDT", "BTC", "ETH"].into_iter().map(Currency::new).collect(),
        }
    }
}

/// Resolves a conversion rate across the configured sources.
///
/// Steps run in order and the first success wins:
///
/// 1. a cached rate, when the request allows one and it is fresh enough;
/// 2. the preferred source, when the request names one;
/// 3. every other registered source, in registry order;
/// 4. for each remaining source and each intermediary, `from -> via` and
///    `via -> to` fetched concurrently and multiplied.
///
/// Any freshly fetched rate is written back to the cache. Nothing is written
/// when the result came from the cache or when resolution fails.
pub struct RateResolver {
    registry: RateSourceRegistry,
    cache: RateCache,
    config: ResolverConfig,
}

impl RateResolver {
    /// Create a new resolver.
    pub fn new(registry: RateSourceRegistry, cache: RateCache, config: ResolverConfig) -> Self {
        Self {
            registry,
            cache,
            config,
        }
    }

    /// Convert `request.amount` along `request.pair`.
    #[instrument(skip(self, request), fields(
        pair = %request.pair,
        preferred = ?request.source,
        amount = %request.amount
    ))]
    pub async fn convert(&self, request: &ConversionRequest) -> FxResult<ConversionResult> {
        let pair = &request.pair;

        if let Some(max_age) = request.cache_max_seconds {
            if let Some(rate) = self.cache.load(pair, max_age).await {
                debug!(source = %rate.source, timestamp = rate.timestamp, "Using cached rate");
                return ConversionResult::new(
                    pair.clone(),
                    &rate,
                    request.amount,
                    RateOrigin::Cache,
                );
            }
        }

        let (rate, origin) = self.fetch_fresh(request).await?;
        let result = ConversionResult::new(pair.clone(), &rate, request.amount, origin)?;

        if result.origin.is_fresh() {
            self.cache.save(pair, &rate).await;
        }

        info!(
            source = %result.source,
            rate = %result.rate,
            origin = ?result.origin,
            "Conversion completed"
        );

        Ok(result)
    }

    /// Get the cache the resolver reads from and writes to.
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Get the source registry.
    pub fn registry(&self) -> &RateSourceRegistry {
        &self.registry
    }

    async fn fetch_fresh(&self, request: &ConversionRequest) -> FxResult<(Rate, RateOrigin)> {
        let pair = &request.pair;
        let mut candidates: Vec<SourceId> = self.registry.ids().collect();

        if let Some(preferred) = request.source {
            let source = self.registry.get(preferred)?;
            if let Some(rate) = Self::fetch_direct(preferred, source, pair).await {
                return Ok((rate, RateOrigin::Preferred));
            }
            candidates.retain(|id| *id != preferred);
        }

        for id in &candidates {
            let source = self.registry.get(*id)?;
            if let Some(rate) = Self::fetch_direct(*id, source, pair).await {
                return Ok((rate, RateOrigin::Fallback));
            }
        }

        if let Some((rate, via)) = self.fetch_via_intermediary(pair, &candidates).await {
            return Ok((rate, RateOrigin::Intermediary { via }));
        }

        warn!(pair = %pair, "Every source and intermediary exhausted");
        Err(FxError::ConversionNotFound(pair.clone()))
    }

    async fn fetch_direct(
        id: SourceId,
        source: &Arc<dyn RateSource>,
        pair: &CurrencyPair,
    ) -> Option<Rate> {
        let value = source.fetch_rate(&pair.from, &pair.to).await;
        debug!(source = %id, pair = %pair, found = value.is_some(), "Direct rate attempt");
        value.map(|v| Rate::new(v, id, now()))
    }

    /// Configured intermediaries minus the pair's own currencies, in order.
    fn intermediaries_for(&self, pair: &CurrencyPair) -> Vec<&Currency> {
        self.config
            .intermediaries
            .iter()
            .filter(|c| **c != pair.from && **c != pair.to)
            .collect()
    }

    async fn fetch_via_intermediary(
        &self,
        pair: &CurrencyPair,
        candidates: &[SourceId],
    ) -> Option<(Rate, Currency)> {
        let intermediaries = self.intermediaries_for(pair);
        if intermediaries.is_empty() {
            debug!(pair = %pair, "No usable intermediary currency");
            return None;
        }

        for id in candidates {
            let Ok(source) = self.registry.get(*id) else {
                continue;
            };

            for via in &intermediaries {
                let (first, second) = tokio::join!(
                    source.fetch_rate(&pair.from, via),
                    source.fetch_rate(via, &pair.to)
                );

                // Overflow counts as a failed combination.
                let combined = match (first, second) {
                    (Some(a), Some(b)) => a.checked_mul(b),
                    _ => None,
                };

                debug!(
                    source = %id,
                    via = %via,
                    found = combined.is_some(),
                    "Intermediary rate attempt"
                );

                if let Some(value) = combined {
                    return Some((Rate::new(value, *id, now()), (*via).clone()));
                }
            }
        }

        None
    }
}
