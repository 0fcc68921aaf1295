//! `[feedback]` section: maturation window and weight learning.

use serde::Deserialize;

use crate::application::performance::sweep::DEFAULT_MATURATION_DAYS;
use crate::domain::weight::{
    DEFAULT_INITIAL_WEIGHT, DEFAULT_LEARNING_RATE, DEFAULT_MAX_WEIGHT, DEFAULT_MIN_WEIGHT,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// Days before a prediction is scored.
    pub maturation_days: u32,
    pub learning_rate: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Weight of a strategy with no history.
    pub initial_weight: f64,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            maturation_days: DEFAULT_MATURATION_DAYS,
            learning_rate: DEFAULT_LEARNING_RATE,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
            initial_weight: DEFAULT_INITIAL_WEIGHT,
        }
    }
}
