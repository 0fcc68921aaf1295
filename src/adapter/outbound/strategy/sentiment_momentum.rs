//! News sentiment confirmed by short-term price momentum.
//!
//! A directional call needs the recent average sentiment past the
//! threshold and price momentum pointing the same way.

use serde::Deserialize;

use super::series::{chronological, mean, percent, tail};
use crate::domain::action::Action;
use crate::domain::id::StrategyName;
use crate::domain::message::AnalysisRequest;
use crate::domain::prediction::{Assessment, PredictionPayload};
use crate::error::Result;
use crate::port::outbound::scorer::StrategyScorer;

pub const NAME: &str = "sentiment_momentum";

/// `[strategies.sentiment_momentum]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentMomentumConfig {
    pub momentum_window: usize,
    pub sentiment_window: usize,
    pub sentiment_threshold: f64,
    pub confidence_multiplier: f64,
}

impl Default for SentimentMomentumConfig {
    fn default() -> Self {
        Self {
            momentum_window: 5,
            sentiment_window: 3,
            sentiment_threshold: 0.3,
            confidence_multiplier: 0.8,
        }
    }
}

pub struct SentimentMomentumStrategy {
    config: SentimentMomentumConfig,
}

impl SentimentMomentumStrategy {
    #[must_use]
    pub fn new(config: SentimentMomentumConfig) -> Self {
        Self { config }
    }
}

impl StrategyScorer for SentimentMomentumStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::new(NAME)
    }

    fn min_history(&self) -> usize {
        self.config.momentum_window
    }

    fn score(&self, request: &AnalysisRequest) -> Result<Assessment> {
        let c = &self.config;
        let history = chronological(&request.historical_data);
        let current_price = request.current_data.price_f64();
        let current_sentiment = request.current_data.sentiment_f64();

        let start = tail(&history, c.momentum_window)
            .first()
            .map_or(0.0, |s| s.price_f64());
        let momentum = if start == 0.0 {
            0.0
        } else {
            (current_price - start) / start
        };

        let sentiments: Vec<f64> = tail(&history, c.sentiment_window)
            .iter()
            .map(|s| s.sentiment_f64())
            .collect();
        let average = mean(&sentiments);
        let alignment = momentum * average;

        let (action, target, confidence) = if average > c.sentiment_threshold && momentum > 0.0 {
            (
                Action::Buy,
                current_price * (1.0 + alignment * 2.0),
                (average * c.confidence_multiplier).abs().min(0.9),
            )
        } else if average < -c.sentiment_threshold && momentum < 0.0 {
            (
                Action::Sell,
                current_price * (1.0 + alignment * 2.0),
                (average * c.confidence_multiplier).abs().min(0.9),
            )
        } else {
            (Action::Hold, current_price, 0.5)
        };

        let rationale = format!(
            "Current sentiment: {current_sentiment:.2}\n\
             {}-day average sentiment: {average:.2}\n\
             {}-day price momentum: {}\n\
             Sentiment-momentum alignment: {alignment:.4}\n\
             Sentiment threshold: ±{:.2}",
            c.sentiment_window,
            c.momentum_window,
            percent(momentum),
            c.sentiment_threshold,
        );

        let payload = PredictionPayload::new(action, Some(target))
            .with("sentiment_strength", average)
            .with("price_momentum", momentum)
            .with("timeframe", "7 days");
        Ok(Assessment::new(payload, confidence, rationale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::analysis_request;

    fn score(current: (f64, f64), history: &[(f64, f64)]) -> Assessment {
        let request = analysis_request("AAPL", current, history);
        SentimentMomentumStrategy::new(SentimentMomentumConfig::default())
            .score(&request)
            .unwrap()
    }

    #[test]
    fn positive_news_and_rising_price_buy() {
        let history = [
            (90.0, 0.0),
            (100.0, 0.1),
            (101.0, 0.2),
            (102.0, 0.5),
            (103.0, 0.5),
            (104.0, 0.5),
        ];
        // start = 100 (oldest of the last five), momentum 10%, avg sentiment 0.5
        let assessment = score((110.0, 0.6), &history);

        assert_eq!(assessment.prediction.action, Action::Buy);
        assert!((assessment.confidence.value() - 0.4).abs() < 1e-9);
        let target = assessment.prediction.target_price.unwrap();
        assert!((target - 110.0 * 1.1).abs() < 1e-9);
        assert_eq!(assessment.prediction.extra["timeframe"], "7 days");
    }

    #[test]
    fn negative_news_and_falling_price_sell() {
        let history = [
            (100.0, 0.0),
            (99.0, 0.0),
            (98.0, -0.6),
            (97.0, -0.6),
            (96.0, -0.6),
        ];
        let assessment = score((90.0, -0.5), &history);
        assert_eq!(assessment.prediction.action, Action::Sell);
        assert!((assessment.confidence.value() - 0.48).abs() < 1e-9);
    }

    #[test]
    fn disagreement_holds() {
        let history = [(100.0, 0.6); 5];
        let assessment = score((95.0, 0.6), &history);
        assert_eq!(assessment.prediction.action, Action::Hold);
        assert!((assessment.confidence.value() - 0.5).abs() < 1e-12);
        assert_eq!(assessment.prediction.target_price, Some(95.0));
    }

    #[test]
    fn current_sentiment_only_informs_the_rationale() {
        let history = [(100.0, 0.0); 5];
        let assessment = score((120.0, 0.9), &history);
        assert_eq!(assessment.prediction.action, Action::Hold);
        assert!(assessment.rationale.starts_with("Current sentiment: 0.90"));
    }
}
