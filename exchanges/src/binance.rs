//! Binance spot ticker source.

use std::time::Duration;

use async_trait::async_trait;
use coinconv_common::Currency;
use coinconv_fx::RateSource;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::http::{build_client, fetch_json, parse_price};

const SOURCE_NAME: &str = "binance";

/// Response of `GET /api/v3/ticker/price`.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: Option<String>,
}

/// Rates from the Binance last-price ticker.
///
/// Binance symbols are the two codes concatenated, e.g. `BTCUSDT`. Only the
/// listed direction is queried; an inverse market is not consulted.
pub struct BinanceSource {
    client: Client,
    base_url: String,
}

impl BinanceSource {
    /// Create a source against `base_url`, e.g. `https://api.binance.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn symbol(from: &Currency, to: &Currency) -> String {
        format!("{}{}", from.code(), to.code())
    }
}

#[async_trait]
impl RateSource for BinanceSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Option<Decimal> {
        let symbol = Self::symbol(from, to);
        let request = self
            .client
            .get(format!("{}/api/v3/ticker/price", self.base_url))
            .query(&[("symbol", symbol.as_str())]);

        let ticker: Option<TickerPrice> = fetch_json(SOURCE_NAME, request).await;
        info!(source = SOURCE_NAME, symbol = %symbol, found = ticker.is_some(), "Request to Binance processed");

        parse_price(SOURCE_NAME, ticker?.price.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol() {
        assert_eq!(
            BinanceSource::symbol(&"BTC".into(), &"USDT".into()),
            "BTCUSDT"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let source = BinanceSource::new("http://localhost:1/", Duration::from_secs(1));
        assert_eq!(source.base_url, "http://localhost:1");
    }

    #[test]
    fn test_ticker_payload() {
        let ticker: TickerPrice =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"4.00000200"}"#).unwrap();
        assert_eq!(ticker.price.as_deref(), Some("4.00000200"));

        let error: TickerPrice =
            serde_json::from_str(r#"{"code":-1121,"msg":"Invalid symbol."}"#).unwrap();
        assert!(error.price.is_none());
    }
}
