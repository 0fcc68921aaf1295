//! Orchestrator timing and window settings.

use std::time::Duration;

use crate::application::decision::engine::DecisionConfig;
use crate::application::performance::sweep::FeedbackConfig;

/// Default seconds between ticks.
pub const DEFAULT_CYCLE_INTERVAL_SECS: u64 = 30;

/// Default seconds an analysis cycle waits for strategy replies.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 10;

/// Default number of prior snapshots sent to strategies.
pub const DEFAULT_HISTORY_WINDOW: usize = 90;

/// Configuration for the orchestrator control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorConfig {
    /// Time between ticks.
    pub cycle_interval: Duration,
    /// Time an analysis cycle stays open for replies.
    pub grace_period: Duration,
    /// Prior snapshots included with each analysis request.
    pub history_window: usize,
    /// Decision engine settings.
    pub decision: DecisionConfig,
    /// Maturation sweep settings.
    pub feedback: FeedbackConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(DEFAULT_CYCLE_INTERVAL_SECS),
            grace_period: Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS),
            history_window: DEFAULT_HISTORY_WINDOW,
            decision: DecisionConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }
}
