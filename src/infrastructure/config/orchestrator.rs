//! `[orchestrator]` section.

use serde::Deserialize;

use crate::application::orchestration::config::{
    DEFAULT_CYCLE_INTERVAL_SECS, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_HISTORY_WINDOW,
};

/// Default seconds a provider lookup may take before it is answered as failed.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Control loop timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrchestratorSettings {
    /// Seconds between ticks.
    pub cycle_interval_secs: u64,
    /// Seconds an analysis cycle waits for strategy replies.
    pub grace_period_secs: u64,
    /// Prior snapshots sent with each analysis request.
    pub history_window: usize,
    pub provider_timeout_secs: u64,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            cycle_interval_secs: DEFAULT_CYCLE_INTERVAL_SECS,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            history_window: DEFAULT_HISTORY_WINDOW,
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}
