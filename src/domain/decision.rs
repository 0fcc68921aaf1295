//! Ensemble decisions and the votes that feed them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::id::{AssetId, StrategyName};
use super::prediction::{Confidence, Prediction, PredictionPayload};

/// One strategy's opinion as the decision engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub strategy: StrategyName,
    pub prediction: PredictionPayload,
    pub confidence: Confidence,
}

impl Vote {
    #[must_use]
    pub fn new(strategy: StrategyName, prediction: PredictionPayload, confidence: Confidence) -> Self {
        Self {
            strategy,
            prediction,
            confidence,
        }
    }

    #[must_use]
    pub fn action(&self) -> Action {
        self.prediction.action
    }
}

impl From<&Prediction> for Vote {
    fn from(prediction: &Prediction) -> Self {
        Self::new(
            prediction.strategy.clone(),
            prediction.payload.clone(),
            prediction.confidence,
        )
    }
}

/// A vote after its strategy's trust weight was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPrediction {
    pub strategy: StrategyName,
    pub prediction: PredictionPayload,
    pub confidence: f64,
    pub weight: f64,
    pub weighted_confidence: f64,
}

/// Normalized share of weighted confidence per action.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketScores {
    pub buy: f64,
    pub sell: f64,
    pub hold: f64,
}

impl BucketScores {
    #[must_use]
    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::Buy => self.buy,
            Action::Sell => self.sell,
            Action::Hold => self.hold,
        }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.buy + self.sell + self.hold
    }
}

/// The ensemble's call for one asset at one snapshot timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub confidence: Confidence,
    pub rationale: String,
    pub weighted_predictions: Vec<WeightedPrediction>,
}
