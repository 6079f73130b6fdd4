//! Currency conversion types.

use coinconv_common::{two_decimal, Currency, CurrencyPair, EpochSeconds, Rate, SourceId};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{FxError, FxResult};

/// Request to perform a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Pair to convert along.
    pub pair: CurrencyPair,
    /// Source to try before any other.
    pub source: Option<SourceId>,
    /// Amount of `pair.from` to convert.
    pub amount: Decimal,
    /// Accept a cached rate at most this many seconds old.
    pub cache_max_seconds: Option<u64>,
}

impl ConversionRequest {
    /// Create a new conversion request with no preferred source and no cache use.
    pub fn new(from: impl Into<Currency>, to: impl Into<Currency>, amount: Decimal) -> Self {
        Self {
            pair: CurrencyPair::new(from, to),
            source: None,
            amount,
            cache_max_seconds: None,
        }
    }

    /// Try this source first.
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Allow cached rates up to `seconds` old.
    pub fn with_cache_max_seconds(mut self, seconds: u64) -> Self {
        self.cache_max_seconds = Some(seconds);
        self
    }
}

/// How the resolver obtained the rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateOrigin {
    /// Served from cache; no source was queried.
    Cache,
    /// Fetched directly from the requested source.
    Preferred,
    /// Fetched directly from another configured source.
    Fallback,
    /// Derived from two fetches through an intermediary currency.
    Intermediary { via: Currency },
}

impl RateOrigin {
    /// Whether the rate came from a network fetch.
    pub fn is_fresh(&self) -> bool {
        !matches!(self, RateOrigin::Cache)
    }
}

/// Represents a completed currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub from: Currency,
    pub to: Currency,
    /// Source the rate is attributed to.
    pub source: SourceId,
    #[serde(serialize_with = "two_decimal::serialize")]
    pub rate: Decimal,
    /// `amount * rate`, unrounded until serialized.
    #[serde(serialize_with = "two_decimal::serialize")]
    pub result: Decimal,
    /// When the rate was fetched. For cache hits this is the original fetch time.
    pub timestamp: EpochSeconds,
    #[serde(skip)]
    pub origin: RateOrigin,
}

impl ConversionResult {
    /// Price `amount` along `pair` at `rate`.
    ///
    /// Fails with `InvalidRequest` when the product does not fit a `Decimal`.
    pub fn new(
        pair: CurrencyPair,
        rate: &Rate,
        amount: Decimal,
        origin: RateOrigin,
    ) -> FxResult<Self> {
        let result = rate
            .apply(amount)
            .ok_or_else(|| FxError::InvalidRequest("amount too large".to_string()))?;

        Ok(Self {
            from: pair.from,
            to: pair.to,
            source: rate.source,
            rate: rate.value,
            result,
            timestamp: rate.timestamp,
            origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_builder() {
        let request = ConversionRequest::new("BTC", "ETH", dec!(1.0))
            .with_source(SourceId::Binance)
            .with_cache_max_seconds(300);

        assert_eq!(request.pair, CurrencyPair::new("BTC", "ETH"));
        assert_eq!(request.source, Some(SourceId::Binance));
        assert_eq!(request.cache_max_seconds, Some(300));
    }

    #[test]
    fn test_result_wire_shape() {
        let rate = Rate::new(dec!(1.23456), SourceId::Binance, 1_700_000_000);
        let result = ConversionResult::new(
            CurrencyPair::new("BTC", "USDT"),
            &rate,
            dec!(2.0),
            RateOrigin::Cache,
        )
        .unwrap();

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "BTC",
                "to": "USDT",
                "source": "binance",
                "rate": "1.23",
                "result": "2.47",
                "timestamp": 1_700_000_000,
            })
        );
    }

    #[test]
    fn test_overflowing_amount_is_rejected() {
        let rate = Rate::new(dec!(2), SourceId::Binance, 0);

        let err = ConversionResult::new(
            CurrencyPair::new("BTC", "USDT"),
            &rate,
            Decimal::MAX,
            RateOrigin::Preferred,
        )
        .unwrap_err();

        assert!(matches!(err, FxError::InvalidRequest(ref msg) if msg == "amount too large"));
    }

    #[test]
    fn test_origin_freshness() {
        assert!(!RateOrigin::Cache.is_fresh());
        assert!(RateOrigin::Fallback.is_fresh());
        assert!(RateOrigin::Intermediary { via: "USDT".into() }.is_fresh());
    }

    proptest! {
        #[test]
        fn prop_result_is_amount_times_rate_rounded(
            amount_units in 0i64..1_000_000_000,
            amount_scale in 0u32..8,
            rate_units in 1i64..1_000_000_000,
            rate_scale in 0u32..10,
        ) {
            let amount = Decimal::new(amount_units, amount_scale);
            let value = Decimal::new(rate_units, rate_scale);
            let rate = Rate::new(value, SourceId::Kucoin, 0);

            let result = ConversionResult::new(
                CurrencyPair::new("A", "B"),
                &rate,
                amount,
                RateOrigin::Fallback,
            )
            .unwrap();
            let json = serde_json::to_value(&result).unwrap();

            let expected = (amount * value).round_dp(2);
            let rendered: Decimal = json["result"].as_str().unwrap().parse().unwrap();
            prop_assert_eq!(rendered, expected);
            prop_assert_eq!(result.result, amount * value);
        }
    }
}
