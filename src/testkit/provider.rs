//! Scripted market data providers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::id::AssetId;
use crate::domain::message::PriceResponse;
use crate::domain::snapshot::SentimentReading;
use crate::error::{Error, Result};
use crate::port::outbound::provider::{PriceProvider, SentimentProvider};

/// Always quotes the same price, optionally after a delay.
pub struct FixedPriceProvider {
    price: Decimal,
    delay: Option<Duration>,
}

impl FixedPriceProvider {
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self { price, delay: None }
    }

    /// Sleep before every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl PriceProvider for FixedPriceProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn price(&self, ticker: &AssetId) -> Result<PriceResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(PriceResponse {
            ticker: ticker.clone(),
            timestamp: Utc::now(),
            price: self.price,
            currency: "USD".into(),
            volume: 1_000,
        })
    }
}

/// Always reports the same sentiment reading.
pub struct FixedSentimentProvider {
    reading: SentimentReading,
}

impl FixedSentimentProvider {
    #[must_use]
    pub fn new(reading: SentimentReading) -> Self {
        Self { reading }
    }
}

#[async_trait]
impl SentimentProvider for FixedSentimentProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn sentiment(&self, _ticker: &AssetId) -> Result<SentimentReading> {
        Ok(self.reading)
    }
}

/// Fails every lookup with the given reason.
pub struct FailingProvider {
    reason: String,
}

impl FailingProvider {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PriceProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn price(&self, _ticker: &AssetId) -> Result<PriceResponse> {
        Err(Error::Provider(self.reason.clone()))
    }
}

#[async_trait]
impl SentimentProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn sentiment(&self, _ticker: &AssetId) -> Result<SentimentReading> {
        Err(Error::Provider(self.reason.clone()))
    }
}
