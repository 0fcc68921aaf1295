//! Strategy trust weights and the multiplicative learning rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::StrategyName;

/// Default lower bound on a strategy weight.
pub const DEFAULT_MIN_WEIGHT: f64 = 0.1;
/// Default upper bound on a strategy weight.
pub const DEFAULT_MAX_WEIGHT: f64 = 2.0;
/// Weight every strategy starts with.
pub const DEFAULT_INITIAL_WEIGHT: f64 = 1.0;
/// Default learning rate λ.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Persisted trust weight for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeight {
    pub strategy: StrategyName,
    pub weight: f64,
    pub performance_score: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl StrategyWeight {
    #[must_use]
    pub fn initial(strategy: StrategyName, weight: f64, at: DateTime<Utc>) -> Self {
        Self {
            strategy,
            weight,
            performance_score: None,
            updated_at: at,
        }
    }
}

/// Inclusive weight range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    pub min: f64,
    pub max: f64,
}

impl WeightBounds {
    #[must_use]
    pub fn clamp(&self, weight: f64) -> f64 {
        weight.clamp(self.min, self.max)
    }
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WEIGHT,
            max: DEFAULT_MAX_WEIGHT,
        }
    }
}

/// `new = clamp(current × (1 + λ × score))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRule {
    pub learning_rate: f64,
    pub bounds: WeightBounds,
}

impl LearningRule {
    #[must_use]
    pub const fn new(learning_rate: f64, bounds: WeightBounds) -> Self {
        Self {
            learning_rate,
            bounds,
        }
    }

    /// Apply one performance score to a weight.
    ///
    /// The result always lies within the bounds. A non-finite score or
    /// current weight leaves the (clamped) current weight unchanged.
    #[must_use]
    pub fn apply(&self, current: f64, score: f64) -> f64 {
        let current = if current.is_finite() {
            self.bounds.clamp(current)
        } else {
            self.bounds.clamp(DEFAULT_INITIAL_WEIGHT)
        };
        if !score.is_finite() {
            return current;
        }
        let next = current * (1.0 + self.learning_rate * score);
        if next.is_nan() {
            return current;
        }
        self.bounds.clamp(next)
    }
}

impl Default for LearningRule {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, WeightBounds::default())
    }
}
