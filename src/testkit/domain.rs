//! Builders for domain values and bus replies used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::action::Action;
use crate::domain::id::{AssetId, CycleId, StrategyName};
use crate::domain::message::{
    Address, AnalysisRequest, Envelope, Message, PriceResponse, SentimentResponse,
    StrategyResponse,
};
use crate::domain::prediction::{Assessment, Confidence, Prediction, PredictionPayload};
use crate::domain::snapshot::{SentimentReading, Snapshot};

/// A stored-shape prediction with confidence 0.7.
pub fn prediction_at(ticker: &str, strategy: &str, at: DateTime<Utc>, action: Action) -> Prediction {
    Prediction::new(
        AssetId::new(ticker),
        StrategyName::new(strategy),
        at,
        Assessment::new(PredictionPayload::new(action, None), 0.7, "fixture"),
    )
}

/// Price reply from the price provider.
pub fn price_reply(ticker: &str, at: DateTime<Utc>, price: Decimal) -> Envelope {
    Envelope::new(
        Address::price_provider(),
        Message::PriceResponse(PriceResponse {
            ticker: AssetId::new(ticker),
            timestamp: at,
            price,
            currency: "USD".into(),
            volume: 1_000,
        }),
    )
}

/// Sentiment reply whose magnitude is `|score|`.
pub fn sentiment_reply(ticker: &str, at: DateTime<Utc>, score: f64) -> Envelope {
    Envelope::new(
        Address::sentiment_provider(),
        Message::SentimentResponse(SentimentResponse {
            ticker: AssetId::new(ticker),
            timestamp: at,
            sentiment_score: score,
            sentiment_magnitude: score.abs(),
            news_count: 3,
        }),
    )
}

/// A strategy's answer to `request`.
pub fn strategy_reply(
    request: &AnalysisRequest,
    strategy: &str,
    action: Action,
    confidence: f64,
) -> Envelope {
    let name = StrategyName::new(strategy);
    Envelope::new(
        Address::strategy(&name),
        Message::StrategyResponse(StrategyResponse {
            cycle: request.cycle.clone(),
            asset_id: request.asset_id.clone(),
            timestamp: request.timestamp,
            strategy_name: name,
            prediction: PredictionPayload::new(action, None),
            confidence: Confidence::clamped(confidence),
            rationale: format!("{strategy} fixture"),
        }),
    )
}

/// One snapshot per day ending the day before `end`, given oldest first
/// as `(price, sentiment)` pairs and returned newest first like the store.
pub fn history(ticker: &str, end: DateTime<Utc>, points: &[(f64, f64)]) -> Vec<Snapshot> {
    let count = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, (price, sentiment))| {
            let days_back = i64::try_from(count - i).unwrap_or(i64::MAX);
            snapshot(ticker, end - Duration::days(days_back), *price, *sentiment)
        })
        .rev()
        .collect()
}

/// Priced snapshot carrying a sentiment reading.
pub fn snapshot(ticker: &str, at: DateTime<Utc>, price: f64, sentiment: f64) -> Snapshot {
    let mut snapshot = Snapshot::new(AssetId::new(ticker), at);
    snapshot.price = Decimal::from_f64(price);
    snapshot.volume = Some(1_000);
    snapshot.currency = Some("USD".into());
    if let Ok(reading) = SentimentReading::try_new(sentiment, sentiment.abs(), 1) {
        snapshot.sentiment_score = Some(reading.score());
        snapshot.sentiment_magnitude = Some(reading.magnitude());
    }
    snapshot
}

/// Analysis request for `ticker` with the current observation and prior
/// points given oldest first.
pub fn analysis_request(
    ticker: &str,
    current: (f64, f64),
    prior: &[(f64, f64)],
) -> AnalysisRequest {
    let now = Utc::now();
    AnalysisRequest {
        cycle: CycleId::new(),
        asset_id: AssetId::new(ticker),
        timestamp: now,
        current_data: snapshot(ticker, now, current.0, current.1),
        historical_data: history(ticker, now, prior),
    }
}
