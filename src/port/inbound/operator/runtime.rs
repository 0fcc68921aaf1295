//! Runtime control projection types for operator-facing adapters.
//!
//! Defines request and response types for starting the control loop.

use async_trait::async_trait;

use crate::error::Result;

/// Runtime configuration overrides from CLI flags.
///
/// Every optional field takes precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Override for the SQLite database location.
    pub database_path: Option<String>,

    /// Database used when neither the override nor the configuration
    /// names one.
    pub default_database: String,

    /// Override for log level (e.g., "debug", "info", "warn").
    pub log_level: Option<String>,

    /// Whether to output logs as JSON.
    pub json_logs: bool,

    /// Override for the cycle interval in seconds.
    pub interval_secs: Option<u64>,

    /// Override for the grace period in seconds.
    pub grace_secs: Option<u64>,

    /// Use the simulated market data provider.
    pub simulated: bool,

    /// Override for enabled strategy names.
    pub strategies: Option<Vec<String>>,
}

/// Startup information snapshot for display.
#[derive(Debug, Clone)]
pub struct RunStartupSnapshot {
    /// Resolved database location.
    pub database: String,

    /// Market data provider in use.
    pub provider: String,

    /// Seconds between ticks.
    pub cycle_interval_secs: u64,

    /// Seconds a cycle waits for strategy replies.
    pub grace_period_secs: u64,

    /// Days before a prediction is scored.
    pub maturation_days: u32,

    /// Names of enabled strategies.
    pub enabled_strategies: Vec<String>,
}

/// Runtime control use-cases for operator-facing adapters.
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Prepare a startup snapshot from runtime overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot>;

    /// Run the control loop until interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if runtime initialization or execution fails.
    async fn execute_run(&self, request: RunRequest) -> Result<()>;
}
