//! Configuration operator implementation.

use crate::adapter::outbound::provider::settings::ProviderSource;
use crate::adapter::outbound::strategy::registry::describe;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_strategy_registry;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::configuration::{
    ConfigFeedback, ConfigValidationReport, ConfigView, ConfigurationOperator, StrategyInfo,
};

use super::entry::Operator;

impl ConfigurationOperator for Operator {
    fn show_config(&self, config_toml: &str) -> Result<ConfigView> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigView {
            database: config
                .database
                .path
                .clone()
                .unwrap_or_else(|| "(default)".to_string()),
            log_level: config.logging.level.clone(),
            log_format: config.logging.format.clone(),
            provider: config.providers.source.to_string(),
            cycle_interval_secs: config.orchestrator.cycle_interval_secs,
            grace_period_secs: config.orchestrator.grace_period_secs,
            history_window: config.orchestrator.history_window,
            provider_timeout_secs: config.orchestrator.provider_timeout_secs,
            decision_threshold: config.decision.threshold,
            feedback: ConfigFeedback {
                maturation_days: config.feedback.maturation_days,
                learning_rate: config.feedback.learning_rate,
                min_weight: config.feedback.min_weight,
                max_weight: config.feedback.max_weight,
                initial_weight: config.feedback.initial_weight,
            },
            enabled_strategies: config.enabled_strategies(),
        })
    }

    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport> {
        let config = Config::parse_toml(config_toml)?;
        let mut warnings = Vec::new();

        if config.strategies.enabled.is_empty() {
            warnings.push("No strategies enabled; every decision will be hold".to_string());
        }

        if config.providers.source == ProviderSource::Simulated {
            warnings.push("Simulated market data provider selected".to_string());
        }

        let history_needed = build_strategy_registry(&config)
            .scorers()
            .iter()
            .map(|scorer| scorer.min_history())
            .max()
            .unwrap_or_default();
        if config.orchestrator.history_window < history_needed {
            warnings.push(format!(
                "history_window {} is below the {history_needed} snapshots some strategies need",
                config.orchestrator.history_window
            ));
        }

        Ok(ConfigValidationReport { warnings })
    }

    fn available_strategies(&self) -> Vec<StrategyInfo> {
        build_strategy_registry(&Config::default())
            .scorers()
            .iter()
            .map(|scorer| {
                let name = scorer.name().to_string();
                StrategyInfo {
                    summary: describe(&name).unwrap_or_default().to_string(),
                    min_history: scorer.min_history(),
                    name,
                }
            })
            .collect()
    }
}
