//! Weighted ensemble vote.
//!
//! Every strategy vote is scaled by its trust weight, summed per action
//! bucket and normalized. An action wins only when its share is above the
//! threshold and strictly ahead of both other buckets; anything else falls
//! back to a hold whose confidence never drops below one half.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::action::Action;
use crate::domain::decision::{BucketScores, Decision, Vote, WeightedPrediction};
use crate::domain::id::{AssetId, StrategyName};
use crate::domain::prediction::Confidence;
use crate::domain::weight::DEFAULT_INITIAL_WEIGHT;

/// Rationale recorded when no vote carried any weight.
pub const NO_CONFIDENT_PREDICTIONS: &str = "No confident predictions available";

/// Confidence assigned to the degenerate hold and the floor for any hold.
pub const HOLD_FLOOR: f64 = 0.5;

/// Default share an action must exceed to win.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Configuration for the decision engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionConfig {
    /// Share a buy or sell bucket must strictly exceed.
    pub threshold: f64,
    /// Weight used for strategies without a stored weight.
    pub default_weight: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            default_weight: DEFAULT_INITIAL_WEIGHT,
        }
    }
}

/// Deterministic weighted-vote decision engine.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    #[must_use]
    pub const fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Scale each vote by its strategy's weight.
    #[must_use]
    pub fn weigh(
        &self,
        votes: &[Vote],
        weights: &HashMap<StrategyName, f64>,
    ) -> Vec<WeightedPrediction> {
        votes
            .iter()
            .map(|vote| {
                let weight = weights
                    .get(&vote.strategy)
                    .copied()
                    .unwrap_or(self.config.default_weight);
                let confidence = vote.confidence.value();
                WeightedPrediction {
                    strategy: vote.strategy.clone(),
                    prediction: vote.prediction.clone(),
                    confidence,
                    weight,
                    weighted_confidence: confidence * weight,
                }
            })
            .collect()
    }

    /// Normalized bucket shares, or `None` when the weighted total is zero.
    #[must_use]
    pub fn scores(&self, weighted: &[WeightedPrediction]) -> Option<BucketScores> {
        let mut totals = BucketScores::default();
        for prediction in weighted {
            match prediction.prediction.action {
                Action::Buy => totals.buy += prediction.weighted_confidence,
                Action::Sell => totals.sell += prediction.weighted_confidence,
                Action::Hold => totals.hold += prediction.weighted_confidence,
            }
        }

        let total = totals.sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(BucketScores {
            buy: totals.buy / total,
            sell: totals.sell / total,
            hold: totals.hold / total,
        })
    }

    /// Pick the winning action and its confidence from normalized shares.
    #[must_use]
    pub fn choose(&self, scores: &BucketScores) -> (Action, f64) {
        let threshold = self.config.threshold;
        if scores.buy > threshold && scores.buy > scores.sell && scores.buy > scores.hold {
            (Action::Buy, scores.buy)
        } else if scores.sell > threshold && scores.sell > scores.buy && scores.sell > scores.hold
        {
            (Action::Sell, scores.sell)
        } else {
            (Action::Hold, scores.hold.max(HOLD_FLOOR))
        }
    }

    /// Combine votes into one decision for `asset` at `timestamp`.
    ///
    /// Strategies missing from `weights` count with the default weight.
    #[must_use]
    pub fn decide(
        &self,
        asset: &AssetId,
        timestamp: DateTime<Utc>,
        votes: &[Vote],
        weights: &HashMap<StrategyName, f64>,
    ) -> Decision {
        let weighted_predictions = self.weigh(votes, weights);

        let Some(scores) = self.scores(&weighted_predictions) else {
            return Decision {
                asset_id: asset.clone(),
                timestamp,
                action: Action::Hold,
                confidence: Confidence::clamped(HOLD_FLOOR),
                rationale: NO_CONFIDENT_PREDICTIONS.to_string(),
                weighted_predictions,
            };
        };

        let (action, confidence) = self.choose(&scores);
        let rationale = format!(
            "Buy confidence: {:.2}, Sell confidence: {:.2}, Hold confidence: {:.2}\n\
             Based on {} strategy predictions with relative weights.",
            scores.buy,
            scores.sell,
            scores.hold,
            weighted_predictions.len()
        );

        Decision {
            asset_id: asset.clone(),
            timestamp,
            action,
            confidence: Confidence::clamped(confidence),
            rationale,
            weighted_predictions,
        }
    }
}
