//! Live smoke tests against the Yahoo Finance endpoints.
//!
//! These tests need network access and are gated behind the
//! `integration-tests` feature flag. They are also marked `#[ignore]` so a
//! plain feature build does not hit the network by accident.
//!
//! ```bash
//! cargo test --features integration-tests --test yahoo_live_tests -- --ignored
//! ```

#![cfg(feature = "integration-tests")]

use augury::adapter::outbound::provider::settings::YahooConfig;
use augury::adapter::outbound::provider::yahoo::YahooClient;
use augury::domain::id::AssetId;
use augury::port::outbound::provider::{PriceProvider, SentimentProvider};
use rust_decimal::Decimal;

fn client() -> YahooClient {
    YahooClient::from_config(&YahooConfig::default()).unwrap()
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_price() {
    let response = client().price(&AssetId::new("AAPL")).await.unwrap();
    assert_eq!(response.ticker, AssetId::new("AAPL"));
    assert!(response.price > Decimal::ZERO);
    assert!(!response.currency.is_empty());
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_sentiment_is_bounded() {
    let reading = client().sentiment(&AssetId::new("MSFT")).await.unwrap();
    assert!((-1.0..=1.0).contains(&reading.score()));
    assert!((0.0..=1.0).contains(&reading.magnitude()));
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_unknown_ticker_fails() {
    let result = client().price(&AssetId::new("NOT-A-REAL-TICKER-XYZ")).await;
    assert!(result.is_err());
}
