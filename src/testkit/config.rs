//! Canonical test configurations.

use std::time::Duration;

use crate::application::orchestration::config::OrchestratorConfig;

/// Orchestrator config with short timings so loop tests finish quickly.
#[must_use]
pub fn orchestrator() -> OrchestratorConfig {
    OrchestratorConfig {
        cycle_interval: Duration::from_millis(50),
        grace_period: Duration::from_millis(200),
        history_window: 10,
        ..OrchestratorConfig::default()
    }
}
