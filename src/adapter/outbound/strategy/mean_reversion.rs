//! Z-score mean reversion.
//!
//! Prices more than `z_threshold` population standard deviations away
//! from the lookback mean are expected to revert toward it.

use serde::Deserialize;

use super::series::{chronological, mean, std_dev, tail, two_tailed_p};
use crate::domain::action::Action;
use crate::domain::id::StrategyName;
use crate::domain::message::AnalysisRequest;
use crate::domain::prediction::{Assessment, PredictionPayload};
use crate::error::Result;
use crate::port::outbound::scorer::StrategyScorer;

pub const NAME: &str = "mean_reversion";

/// `[strategies.mean_reversion]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeanReversionConfig {
    /// Historical snapshots the mean is computed over.
    pub lookback: usize,
    pub z_threshold: f64,
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        Self {
            lookback: 30,
            z_threshold: 2.0,
        }
    }
}

pub struct MeanReversionStrategy {
    config: MeanReversionConfig,
}

impl MeanReversionStrategy {
    #[must_use]
    pub fn new(config: MeanReversionConfig) -> Self {
        Self { config }
    }
}

impl StrategyScorer for MeanReversionStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::new(NAME)
    }

    fn min_history(&self) -> usize {
        self.config.lookback
    }

    fn score(&self, request: &AnalysisRequest) -> Result<Assessment> {
        let c = &self.config;
        let prices: Vec<f64> = chronological(&request.historical_data)
            .into_iter()
            .map(|s| s.price_f64())
            .collect();
        let window = tail(&prices, c.lookback);
        let current = request.current_data.price_f64();

        let average = mean(window);
        let deviation = std_dev(window);
        let z = if deviation == 0.0 {
            0.0
        } else {
            (current - average) / deviation
        };

        let (action, target, confidence) = if z > c.z_threshold {
            (Action::Sell, average, (z.abs() / 5.0).min(0.9))
        } else if z < -c.z_threshold {
            (Action::Buy, average, (z.abs() / 5.0).min(0.9))
        } else {
            (Action::Hold, current, 0.5)
        };

        let rationale = format!(
            "Z-Score: {z:.2} (threshold: ±{:?})\n\
             Current price: {current} vs Historical mean: {average:.2}\n\
             Standard deviation: {deviation:.2}\n\
             Statistical significance: p-value = {:.4}\n\
             Based on {}-day historical data",
            c.z_threshold,
            two_tailed_p(z),
            c.lookback,
        );

        let payload = PredictionPayload::new(action, Some(target))
            .with("expected_reversion", average)
            .with("timeframe", format!("{} days", c.lookback / 2));
        Ok(Assessment::new(payload, confidence, rationale))
    }
}
