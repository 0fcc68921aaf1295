//! Typed messages exchanged between endpoints.
//!
//! Every request names the address its reply should go to through the
//! [`Envelope`] it travels in. Analysis traffic additionally carries the
//! [`CycleId`] of the fan-out so late or foreign replies can be told apart.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{AssetId, CycleId, StrategyName};
use super::prediction::{Confidence, PredictionPayload};
use super::snapshot::{SentimentReading, Snapshot};

/// Name of an addressable endpoint on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn orchestrator() -> Self {
        Self::new("orchestrator")
    }

    #[must_use]
    pub fn price_provider() -> Self {
        Self::new("provider.price")
    }

    #[must_use]
    pub fn sentiment_provider() -> Self {
        Self::new("provider.sentiment")
    }

    #[must_use]
    pub fn strategy(name: &StrategyName) -> Self {
        Self(format!("strategy.{name}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub ticker: AssetId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub ticker: AssetId,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub currency: String,
    pub volume: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub ticker: AssetId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub ticker: AssetId,
    pub timestamp: DateTime<Utc>,
    pub sentiment_score: f64,
    pub sentiment_magnitude: f64,
    pub news_count: u32,
}

impl SentimentResponse {
    #[must_use]
    pub fn new(ticker: AssetId, timestamp: DateTime<Utc>, reading: SentimentReading) -> Self {
        Self {
            ticker,
            timestamp,
            sentiment_score: reading.score(),
            sentiment_magnitude: reading.magnitude(),
            news_count: reading.news_count(),
        }
    }

    /// Validated view of the reading.
    pub fn reading(&self) -> Result<SentimentReading, DomainError> {
        SentimentReading::try_new(
            self.sentiment_score,
            self.sentiment_magnitude,
            self.news_count,
        )
    }
}

/// Fan-out request to one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub cycle: CycleId,
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub current_data: Snapshot,
    /// Prior snapshots, newest first.
    pub historical_data: Vec<Snapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResponse {
    pub cycle: CycleId,
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub strategy_name: StrategyName,
    pub prediction: PredictionPayload,
    pub confidence: Confidence,
    pub rationale: String,
}

/// Which provider stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Price,
    Sentiment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => f.write_str("price"),
            Self::Sentiment => f.write_str("sentiment"),
        }
    }
}

/// Reply sent instead of data when a provider errors or times out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub ticker: AssetId,
    pub stage: Stage,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    PriceRequest(PriceRequest),
    PriceResponse(PriceResponse),
    SentimentRequest(SentimentRequest),
    SentimentResponse(SentimentResponse),
    AnalysisRequest(AnalysisRequest),
    StrategyResponse(StrategyResponse),
    ProviderFailed(ProviderFailure),
}

impl Message {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PriceRequest(_) => "price_request",
            Self::PriceResponse(_) => "price_response",
            Self::SentimentRequest(_) => "sentiment_request",
            Self::SentimentResponse(_) => "sentiment_response",
            Self::AnalysisRequest(_) => "analysis_request",
            Self::StrategyResponse(_) => "strategy_response",
            Self::ProviderFailed(_) => "provider_failed",
        }
    }
}

/// A message plus the address replies should go to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: Address,
    pub message: Message,
}

impl Envelope {
    #[must_use]
    pub fn new(from: Address, message: Message) -> Self {
        Self { from, message }
    }
}
