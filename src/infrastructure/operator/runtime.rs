//! Runtime operator implementation.

use async_trait::async_trait;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::adapter::outbound::provider::settings::ProviderSource;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::strategy::normalize_strategy_name;
use crate::infrastructure::runtime::run_with_shutdown;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot, RuntimeOperator};

use super::{entry::Operator, shared};

#[async_trait]
impl RuntimeOperator for Operator {
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot> {
        let config = self.load_run_config(request)?;

        Ok(RunStartupSnapshot {
            database: Self::resolve_database(&config, request),
            provider: config.providers.source.to_string(),
            cycle_interval_secs: config.orchestrator.cycle_interval_secs,
            grace_period_secs: config.orchestrator.grace_period_secs,
            maturation_days: config.feedback.maturation_days,
            enabled_strategies: config.enabled_strategies(),
        })
    }

    async fn execute_run(&self, request: RunRequest) -> Result<()> {
        let config = self.load_run_config(&request)?;
        let database = Self::resolve_database(&config, &request);
        config.init_logging();

        info!(
            database = %database,
            interval_secs = config.orchestrator.cycle_interval_secs,
            strategies = ?config.enabled_strategies(),
            "augury starting"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut app_handle =
            tokio::spawn(async move { run_with_shutdown(config, &database, shutdown_rx).await });

        tokio::select! {
            result = &mut app_handle => {
                return shared::map_app_result(result);
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received (Ctrl+C)");
                let _ = shutdown_tx.send(true);
            }
        }

        shared::map_app_result(app_handle.await)
    }
}

impl Operator {
    fn load_run_config(&self, request: &RunRequest) -> Result<Config> {
        let mut config = Config::parse_toml(&request.config_toml)?;
        Self::apply_run_overrides(&mut config, request);
        config.validate()?;
        Ok(config)
    }

    fn apply_run_overrides(config: &mut Config, request: &RunRequest) {
        if let Some(ref log_level) = request.log_level {
            config.logging.level = log_level.clone();
        }

        if request.json_logs {
            config.logging.format = "json".to_string();
        }

        if let Some(interval) = request.interval_secs {
            config.orchestrator.cycle_interval_secs = interval;
        }

        if let Some(grace) = request.grace_secs {
            config.orchestrator.grace_period_secs = grace;
        }

        if request.simulated {
            config.providers.source = ProviderSource::Simulated;
        }

        if let Some(ref strategies) = request.strategies {
            config.strategies.enabled = strategies
                .iter()
                .map(|strategy| normalize_strategy_name(strategy))
                .collect();
        }

        if let Some(ref database_path) = request.database_path {
            config.database.path = Some(database_path.clone());
        }
    }

    fn resolve_database(config: &Config, request: &RunRequest) -> String {
        config
            .database
            .path
            .clone()
            .unwrap_or_else(|| request.default_database.clone())
    }
}
