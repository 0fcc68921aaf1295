//! Multi-window price momentum.
//!
//! Blends 10, 30 and 90 day returns of the historical closes with weights
//! 0.5, 0.3 and 0.2. A blended move beyond the threshold predicts
//! continuation in the same direction.

use serde::Deserialize;

use super::series::{chronological, mean, percent, std_dev, tail};
use crate::domain::action::Action;
use crate::domain::id::StrategyName;
use crate::domain::message::AnalysisRequest;
use crate::domain::prediction::{Assessment, PredictionPayload};
use crate::error::Result;
use crate::port::outbound::scorer::StrategyScorer;

pub const NAME: &str = "momentum";

/// `[strategies.momentum]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub short_window: usize,
    pub medium_window: usize,
    pub long_window: usize,
    /// Minimum absolute blended return for a directional call.
    pub threshold: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            short_window: 10,
            medium_window: 30,
            long_window: 90,
            threshold: 0.05,
        }
    }
}

pub struct MomentumStrategy {
    config: MomentumConfig,
}

impl MomentumStrategy {
    #[must_use]
    pub fn new(config: MomentumConfig) -> Self {
        Self { config }
    }
}

/// Return from `prices[-window]` to the last price; 0 when too short or
/// the start price is 0.
fn window_return(prices: &[f64], window: usize) -> f64 {
    if window == 0 || prices.len() < window {
        return 0.0;
    }
    let start = prices[prices.len() - window];
    let end = prices[prices.len() - 1];
    if start == 0.0 {
        return 0.0;
    }
    (end - start) / start
}

impl StrategyScorer for MomentumStrategy {
    fn name(&self) -> StrategyName {
        StrategyName::new(NAME)
    }

    fn min_history(&self) -> usize {
        self.config.long_window
    }

    fn score(&self, request: &AnalysisRequest) -> Result<Assessment> {
        let c = &self.config;
        let prices: Vec<f64> = chronological(&request.historical_data)
            .into_iter()
            .map(|s| s.price_f64())
            .collect();
        let current = request.current_data.price_f64();

        let short = window_return(&prices, c.short_window);
        let medium = window_return(&prices, c.medium_window);
        let long = window_return(&prices, c.long_window);
        let momentum = 0.5 * short + 0.3 * medium + 0.2 * long;

        let (action, target, confidence) = if momentum > c.threshold {
            (Action::Buy, current * (1.0 + momentum / 2.0), (momentum * 5.0).min(0.9))
        } else if momentum < -c.threshold {
            (Action::Sell, current * (1.0 + momentum / 2.0), (momentum.abs() * 5.0).min(0.9))
        } else {
            (Action::Hold, current, 0.5)
        };

        let volatility = if prices.len() >= 30 {
            let recent = tail(&prices, 30);
            let m = mean(recent);
            if m == 0.0 {
                0.0
            } else {
                std_dev(recent) / m
            }
        } else {
            0.0
        };

        let rationale = format!(
            "Short-term momentum ({} days): {}\n\
             Medium-term momentum ({} days): {}\n\
             Long-term momentum ({} days): {}\n\
             Weighted momentum: {} (threshold: ±{})\n\
             30-day volatility: {}",
            c.short_window,
            percent(short),
            c.medium_window,
            percent(medium),
            c.long_window,
            percent(long),
            percent(momentum),
            percent(c.threshold),
            percent(volatility),
        );

        let payload = PredictionPayload::new(action, Some(target))
            .with("momentum_strength", momentum)
            .with("timeframe", "14 days");
        Ok(Assessment::new(payload, confidence, rationale))
    }
}
