//! Market data provider ports.
//!
//! Providers answer one lookup at a time. Transport concerns such as
//! timeouts and replying on the bus live in the endpoint that drives them.

use async_trait::async_trait;

use crate::domain::id::AssetId;
use crate::domain::message::PriceResponse;
use crate::domain::snapshot::SentimentReading;
use crate::error::Result;

/// Source of current prices.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the current price observation for a ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails or the response
    /// carries no usable price.
    async fn price(&self, ticker: &AssetId) -> Result<PriceResponse>;
}

/// Source of news sentiment.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Score recent news for a ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn sentiment(&self, ticker: &AssetId) -> Result<SentimentReading>;
}
