//! Configuration projections for operator-facing adapters.

use crate::error::Result;

/// Feedback section of a configuration view.
#[derive(Debug, Clone)]
pub struct ConfigFeedback {
    pub maturation_days: u32,
    pub learning_rate: f64,
    pub min_weight: f64,
    pub max_weight: f64,
    pub initial_weight: f64,
}

/// Full configuration projection for operator-facing output.
#[derive(Debug, Clone)]
pub struct ConfigView {
    pub database: String,
    pub log_level: String,
    pub log_format: String,
    pub provider: String,
    pub cycle_interval_secs: u64,
    pub grace_period_secs: u64,
    pub history_window: usize,
    pub provider_timeout_secs: u64,
    pub decision_threshold: f64,
    pub feedback: ConfigFeedback,
    pub enabled_strategies: Vec<String>,
}

/// Validation output for `config validate`.
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationReport {
    pub warnings: Vec<String>,
}

/// A strategy the runtime can enable.
#[derive(Debug, Clone)]
pub struct StrategyInfo {
    pub name: String,
    pub min_history: usize,
    pub summary: String,
}

/// Configuration use-cases for operator-facing adapters.
pub trait ConfigurationOperator: Send + Sync {
    /// Build a projection for `config show`.
    fn show_config(&self, config_toml: &str) -> Result<ConfigView>;

    /// Validate config and return non-fatal warnings.
    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport>;

    /// Strategies available to `strategies.enabled`.
    fn available_strategies(&self) -> Vec<StrategyInfo>;
}
