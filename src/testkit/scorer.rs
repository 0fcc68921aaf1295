//! Scorer that returns a fixed assessment.

use crate::domain::action::Action;
use crate::domain::id::StrategyName;
use crate::domain::message::AnalysisRequest;
use crate::domain::prediction::{Assessment, PredictionPayload};
use crate::error::{Error, Result};
use crate::port::outbound::scorer::StrategyScorer;

pub struct FixedScorer {
    name: StrategyName,
    action: Action,
    confidence: f64,
    min_history: usize,
    fail: bool,
}

impl FixedScorer {
    #[must_use]
    pub fn new(name: &str, action: Action, confidence: f64) -> Self {
        Self {
            name: StrategyName::new(name),
            action,
            confidence,
            min_history: 0,
            fail: false,
        }
    }

    #[must_use]
    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    /// Make every call to `score` fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl StrategyScorer for FixedScorer {
    fn name(&self) -> StrategyName {
        self.name.clone()
    }

    fn min_history(&self) -> usize {
        self.min_history
    }

    fn score(&self, _request: &AnalysisRequest) -> Result<Assessment> {
        if self.fail {
            return Err(Error::Strategy("scripted failure".into()));
        }
        Ok(Assessment::new(
            PredictionPayload::new(self.action, None),
            self.confidence,
            format!("{} fixed", self.name),
        ))
    }
}
