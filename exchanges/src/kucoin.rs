//! KuCoin level-1 order book source.

use std::time::Duration;

use async_trait::async_trait;
use coinconv_common::Currency;
use coinconv_fx::RateSource;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::http::{build_client, fetch_json, parse_price};

const SOURCE_NAME: &str = "kucoin";

/// Envelope of `GET /api/v1/market/orderbook/level1`.
#[derive(Debug, Deserialize)]
struct Level1Response {
    data: Option<Level1>,
}

#[derive(Debug, Deserialize)]
struct Level1 {
    price: Option<String>,
}

/// Rates from the KuCoin last-trade price. Symbols are dash-joined, e.g. `BTC-USDT`.
pub struct KucoinSource {
    client: Client,
    base_url: String,
}

impl KucoinSource {
    /// Create a source against `base_url`, e.g. `https://api.kucoin.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn symbol(from: &Currency, to: &Currency) -> String {
        format!("{}-{}", from.code(), to.code())
    }
}

#[async_trait]
impl RateSource for KucoinSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Option<Decimal> {
        let symbol = Self::symbol(from, to);
        let request = self
            .client
            .get(format!("{}/api/v1/market/orderbook/level1", self.base_url))
            .query(&[("symbol", symbol.as_str())]);

        let body: Option<Level1Response> = fetch_json(SOURCE_NAME, request).await;
        info!(source = SOURCE_NAME, symbol = %symbol, found = body.is_some(), "Request to KuCoin processed");

        // Unknown symbols come back as 200 with `"data": null`.
        let level1 = body?.data?;
        parse_price(SOURCE_NAME, level1.price.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol() {
        assert_eq!(
            KucoinSource::symbol(&"ETH".into(), &"BTC".into()),
            "ETH-BTC"
        );
    }

    #[test]
    fn test_level1_payload() {
        let body: Level1Response = serde_json::from_str(
            r#"{"code":"200000","data":{"time":1700000000000,"sequence":"1","price":"0.05321","size":"0.1","bestBid":"0.0532","bestBidSize":"1","bestAsk":"0.05322","bestAskSize":"2"}}"#,
        )
        .unwrap();
        assert_eq!(body.data.unwrap().price.as_deref(), Some("0.05321"));
    }

    #[test]
    fn test_unknown_symbol_payload() {
        let body: Level1Response =
            serde_json::from_str(r#"{"code":"200000","data":null}"#).unwrap();
        assert!(body.data.is_none());
    }
}
