//! Shared HTTP plumbing for exchange sources.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Build an HTTP client with the given request timeout.
pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send `request` and decode a JSON body.
///
/// Transport errors, non-success statuses and undecodable bodies are logged
/// and reported as `None`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    source: &str,
    request: RequestBuilder,
) -> Option<T> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(source, error = %e, "Exchange request failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(source, status = %status, "Conversion rate is not found");
        return None;
    }

    match response.json::<T>().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(source, error = %e, "Malformed exchange response");
            None
        }
    }
}

/// Parse an exchange price string. Missing, empty and invalid prices are `None`.
pub(crate) fn parse_price(source: &str, raw: Option<&str>) -> Option<Decimal> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<Decimal>() {
        Ok(price) => Some(price),
        Err(e) => {
            debug!(source, price = raw, error = %e, "Unparseable price");
            None
        }
    }
}
