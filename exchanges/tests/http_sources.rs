//! Exchange sources against a local fake exchange.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use coinconv_common::Currency;
use coinconv_exchanges::{BinanceSource, KucoinSource};
use coinconv_fx::RateSource;
use rust_decimal_macros::dec;
use serde_json::json;

async fn binance_ticker(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("symbol").map(String::as_str) {
        Some("BTCETH") => (
            StatusCode::OK,
            Json(json!({"symbol": "BTCETH", "price": "3.14159000"})),
        ),
        Some("BADBODY") => (StatusCode::OK, Json(json!({"symbol": "BADBODY"}))),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"code": -1121, "msg": "Invalid symbol."})),
        ),
    }
}

async fn kucoin_level1(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("symbol").map(String::as_str) {
        Some("ETH-BTC") => Json(json!({
            "code": "200000",
            "data": {"time": 1_700_000_000_000u64, "sequence": "1", "price": "2.71828"}
        })),
        Some("EMPTY-PRICE") => Json(json!({"code": "200000", "data": {"price": ""}})),
        _ => Json(json!({"code": "200000", "data": null})),
    }
}

async fn spawn_fake_exchange() -> String {
    let app = Router::new()
        .route("/api/v3/ticker/price", get(binance_ticker))
        .route("/api/v1/market/orderbook/level1", get(kucoin_level1));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn currency(code: &str) -> Currency {
    Currency::new(code)
}

#[tokio::test]
async fn test_binance_known_symbol() {
    let base = spawn_fake_exchange().await;
    let source = BinanceSource::new(base, Duration::from_secs(5));

    let rate = source.fetch_rate(&currency("BTC"), &currency("ETH")).await;

    assert_eq!(rate, Some(dec!(3.14159)));
}

#[tokio::test]
async fn test_binance_error_status_is_none() {
    let base = spawn_fake_exchange().await;
    let source = BinanceSource::new(base, Duration::from_secs(5));

    let rate = source.fetch_rate(&currency("TRX"), &currency("ADA")).await;

    assert_eq!(rate, None);
}

#[tokio::test]
async fn test_binance_missing_price_is_none() {
    let base = spawn_fake_exchange().await;
    let source = BinanceSource::new(base, Duration::from_secs(5));

    let rate = source.fetch_rate(&currency("BAD"), &currency("BODY")).await;

    assert_eq!(rate, None);
}

#[tokio::test]
async fn test_kucoin_known_symbol() {
    let base = spawn_fake_exchange().await;
    let source = KucoinSource::new(base, Duration::from_secs(5));

    let rate = source.fetch_rate(&currency("ETH"), &currency("BTC")).await;

    assert_eq!(rate, Some(dec!(2.71828)));
}

#[tokio::test]
async fn test_kucoin_null_data_is_none() {
    let base = spawn_fake_exchange().await;
    let source = KucoinSource::new(base, Duration::from_secs(5));

    assert_eq!(source.fetch_rate(&currency("FOO"), &currency("BAR")).await, None);
    assert_eq!(
        source.fetch_rate(&currency("EMPTY"), &currency("PRICE")).await,
        None
    );
}

#[tokio::test]
async fn test_unreachable_exchange_is_none() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = BinanceSource::new(format!("http://{}", addr), Duration::from_secs(2));

    assert_eq!(source.fetch_rate(&currency("BTC"), &currency("ETH")).await, None);
}
