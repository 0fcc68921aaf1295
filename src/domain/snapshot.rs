//! Timestamped market and sentiment observations.
//!
//! A [`Snapshot`] is keyed by `(asset, timestamp)`. Price and sentiment
//! arrive separately for the same key, so every field except the key is
//! optional and later partial observations [`merge`](Snapshot::merge) into
//! earlier ones instead of replacing them.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::AssetId;

/// Truncate a timestamp to the microsecond precision snapshots are keyed at.
#[must_use]
pub fn key_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

/// Aggregated news sentiment for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    score: f64,
    magnitude: f64,
    news_count: u32,
}

impl SentimentReading {
    /// Build a reading, enforcing `score ∈ [-1, 1]` and `magnitude ∈ [0, 1]`.
    pub fn try_new(score: f64, magnitude: f64, news_count: u32) -> Result<Self, DomainError> {
        if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
            return Err(DomainError::SentimentOutOfRange {
                field: "score",
                value: score,
            });
        }
        if !magnitude.is_finite() || !(0.0..=1.0).contains(&magnitude) {
            return Err(DomainError::SentimentOutOfRange {
                field: "magnitude",
                value: magnitude,
            });
        }
        Ok(Self {
            score,
            magnitude,
            news_count,
        })
    }

    /// Reading for "no news found".
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            score: 0.0,
            magnitude: 0.0,
            news_count: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub const fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[must_use]
    pub const fn news_count(&self) -> u32 {
        self.news_count
    }
}

/// One `market_data` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub price: Option<Decimal>,
    pub volume: Option<i64>,
    pub sentiment_score: Option<f64>,
    pub sentiment_magnitude: Option<f64>,
    pub currency: Option<String>,
    pub source: Option<String>,
}

impl Snapshot {
    /// Empty observation for a key.
    #[must_use]
    pub fn new(asset_id: AssetId, timestamp: DateTime<Utc>) -> Self {
        Self {
            asset_id,
            timestamp: key_timestamp(timestamp),
            price: None,
            volume: None,
            sentiment_score: None,
            sentiment_magnitude: None,
            currency: None,
            source: None,
        }
    }

    /// Price-only observation.
    pub fn priced(
        asset_id: AssetId,
        timestamp: DateTime<Utc>,
        price: Decimal,
        currency: impl Into<String>,
        volume: i64,
    ) -> Result<Self, DomainError> {
        if price < Decimal::ZERO {
            return Err(DomainError::NegativePrice { price });
        }
        Ok(Self {
            price: Some(price),
            volume: Some(volume),
            currency: Some(currency.into()),
            ..Self::new(asset_id, timestamp)
        })
    }

    /// Sentiment-only observation.
    #[must_use]
    pub fn with_sentiment(
        asset_id: AssetId,
        timestamp: DateTime<Utc>,
        reading: SentimentReading,
    ) -> Self {
        Self {
            sentiment_score: Some(reading.score()),
            sentiment_magnitude: Some(reading.magnitude()),
            ..Self::new(asset_id, timestamp)
        }
    }

    /// Tag the observation with the provider that produced it.
    #[must_use]
    pub fn sourced(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Overlay the non-null fields of `other` onto `self`.
    ///
    /// Keys must match; a mismatched key leaves `self` untouched and
    /// returns `false`.
    pub fn merge(&mut self, other: &Snapshot) -> bool {
        if self.asset_id != other.asset_id || self.timestamp != other.timestamp {
            return false;
        }
        if other.price.is_some() {
            self.price = other.price;
        }
        if other.volume.is_some() {
            self.volume = other.volume;
        }
        if other.sentiment_score.is_some() {
            self.sentiment_score = other.sentiment_score;
        }
        if other.sentiment_magnitude.is_some() {
            self.sentiment_magnitude = other.sentiment_magnitude;
        }
        if other.currency.is_some() {
            self.currency.clone_from(&other.currency);
        }
        if other.source.is_some() {
            self.source.clone_from(&other.source);
        }
        true
    }

    /// Price as `f64` for the numeric strategies; missing prices read as 0.
    #[must_use]
    pub fn price_f64(&self) -> f64 {
        self.price.and_then(|p| p.to_f64()).unwrap_or(0.0)
    }

    /// Sentiment score, missing reads as neutral.
    #[must_use]
    pub fn sentiment_f64(&self) -> f64 {
        self.sentiment_score.unwrap_or(0.0)
    }
}
