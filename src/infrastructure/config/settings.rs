//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to its defaults. `AUGURY_DATABASE` overrides the database
//! path.
//!
//! # Example
//!
//! ```no_run
//! use augury::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::decision::DecisionSettings;
use super::feedback::FeedbackSettings;
use super::logging::LoggingConfig;
use super::orchestrator::OrchestratorSettings;
use super::strategy::{normalize_strategy_name, StrategiesConfig};
use crate::adapter::outbound::provider::settings::ProviderConfig;
use crate::adapter::outbound::strategy::registry::KNOWN_STRATEGIES;
use crate::application::decision::engine::DecisionConfig;
use crate::application::orchestration::config::OrchestratorConfig;
use crate::application::performance::sweep::FeedbackConfig;
use crate::application::weight::book::WeightBookConfig;
use crate::domain::weight::{LearningRule, WeightBounds};
use crate::error::{ConfigError, Result};

/// Environment variable overriding `[database] path`.
pub const DATABASE_ENV: &str = "AUGURY_DATABASE";

/// `[database]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, or `:memory:`. Unset means the CLI default under the
    /// augury home directory.
    pub path: Option<String>,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub orchestrator: OrchestratorSettings,
    pub feedback: FeedbackSettings,
    pub decision: DecisionSettings,
    pub providers: ProviderConfig,
    pub strategies: StrategiesConfig,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                config.database.path = Some(path);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        let o = &self.orchestrator;
        if o.cycle_interval_secs == 0 {
            return Err(invalid("cycle_interval_secs", "must be greater than 0"));
        }
        if o.grace_period_secs == 0 {
            return Err(invalid("grace_period_secs", "must be greater than 0"));
        }
        if o.grace_period_secs >= o.cycle_interval_secs {
            return Err(invalid(
                "grace_period_secs",
                "must be shorter than cycle_interval_secs",
            ));
        }
        if o.provider_timeout_secs == 0 {
            return Err(invalid("provider_timeout_secs", "must be greater than 0"));
        }
        if o.history_window == 0 {
            return Err(invalid("history_window", "must be at least 1"));
        }

        let f = &self.feedback;
        if f.maturation_days == 0 {
            return Err(invalid("maturation_days", "must be greater than 0"));
        }
        if !(f.learning_rate > 0.0 && f.learning_rate <= 1.0) {
            return Err(invalid("learning_rate", "must be in (0, 1]"));
        }
        if !(f.min_weight > 0.0 && f.min_weight <= f.initial_weight && f.initial_weight <= f.max_weight)
        {
            return Err(invalid(
                "initial_weight",
                "must satisfy 0 < min_weight <= initial_weight <= max_weight",
            ));
        }

        let threshold = self.decision.threshold;
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(invalid("threshold", "must be between 0 and 1 (exclusive)"));
        }

        let yahoo = &self.providers.yahoo;
        Url::parse(&yahoo.chart_url).map_err(|e| invalid("chart_url", e.to_string()))?;
        Url::parse(&yahoo.search_url).map_err(|e| invalid("search_url", e.to_string()))?;
        if yahoo.news_limit == 0 {
            return Err(invalid("news_limit", "must be greater than 0"));
        }
        let simulated = &self.providers.simulated;
        if !(simulated.seed_price.is_finite() && simulated.seed_price > 0.0) {
            return Err(invalid("seed_price", "must be greater than 0"));
        }
        if !(simulated.volatility.is_finite() && (0.0..1.0).contains(&simulated.volatility)) {
            return Err(invalid("volatility", "must be in [0, 1)"));
        }

        let mut seen = Vec::new();
        for raw in &self.strategies.enabled {
            let name = normalize_strategy_name(raw);
            if !KNOWN_STRATEGIES.contains(&name.as_str()) {
                return Err(invalid(
                    "strategies.enabled",
                    format!("unknown strategy '{raw}' (known: {})", KNOWN_STRATEGIES.join(", ")),
                ));
            }
            if seen.contains(&name) {
                return Err(invalid("strategies.enabled", format!("'{raw}' is listed twice")));
            }
            seen.push(name);
        }
        Ok(())
    }

    /// Enabled strategy names, normalized.
    #[must_use]
    pub fn enabled_strategies(&self) -> Vec<String> {
        self.strategies
            .enabled
            .iter()
            .map(|raw| normalize_strategy_name(raw))
            .collect()
    }

    /// Weight learning settings for the weight book.
    #[must_use]
    pub fn weight_book(&self) -> WeightBookConfig {
        let f = &self.feedback;
        WeightBookConfig {
            rule: LearningRule::new(
                f.learning_rate,
                WeightBounds {
                    min: f.min_weight,
                    max: f.max_weight,
                },
            ),
            initial_weight: f.initial_weight,
        }
    }

    /// Control loop settings for the orchestrator.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let o = &self.orchestrator;
        OrchestratorConfig {
            cycle_interval: Duration::from_secs(o.cycle_interval_secs),
            grace_period: Duration::from_secs(o.grace_period_secs),
            history_window: o.history_window,
            decision: DecisionConfig {
                threshold: self.decision.threshold,
                default_weight: self.feedback.initial_weight,
            },
            feedback: FeedbackConfig::from_days(self.feedback.maturation_days),
        }
    }

    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.orchestrator.provider_timeout_secs)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::provider::settings::ProviderSource;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.orchestrator.cycle_interval_secs, 30);
        assert_eq!(config.orchestrator.grace_period_secs, 10);
        assert_eq!(config.orchestrator.history_window, 90);
        assert_eq!(config.feedback.maturation_days, 7);
        assert!((config.decision.threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.providers.source, ProviderSource::Yahoo);
        assert_eq!(
            config.enabled_strategies(),
            vec!["momentum", "mean_reversion", "sentiment_momentum"]
        );
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse_toml(
            r#"
            [orchestrator]
            cycle_interval_secs = 60
            grace_period_secs = 20

            [feedback]
            learning_rate = 0.2

            [providers]
            source = "simulated"

            [strategies]
            enabled = ["Momentum", "mean-reversion"]

            [strategies.momentum]
            threshold = 0.1
            "#,
        )
        .unwrap();

        let orchestrator = config.orchestrator_config();
        assert_eq!(orchestrator.cycle_interval, Duration::from_secs(60));
        assert_eq!(orchestrator.grace_period, Duration::from_secs(20));
        assert!((config.weight_book().rule.learning_rate - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.providers.source, ProviderSource::Simulated);
        assert_eq!(config.enabled_strategies(), vec!["momentum", "mean_reversion"]);
        assert!((config.strategies.momentum.threshold - 0.1).abs() < f64::EPSILON);
    }

    fn rejected_field(toml: &str) -> &'static str {
        match Config::parse_toml(toml) {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn grace_must_be_shorter_than_interval() {
        assert_eq!(
            rejected_field("[orchestrator]\ncycle_interval_secs = 10\ngrace_period_secs = 10"),
            "grace_period_secs"
        );
    }

    #[test]
    fn weight_bounds_must_be_ordered() {
        assert_eq!(
            rejected_field("[feedback]\nmin_weight = 1.5\ninitial_weight = 1.0"),
            "initial_weight"
        );
    }

    #[test]
    fn threshold_must_be_a_fraction() {
        assert_eq!(rejected_field("[decision]\nthreshold = 1.0"), "threshold");
    }

    #[test]
    fn unknown_and_duplicate_strategies_are_rejected() {
        assert_eq!(
            rejected_field("[strategies]\nenabled = [\"arbitrage\"]"),
            "strategies.enabled"
        );
        assert_eq!(
            rejected_field("[strategies]\nenabled = [\"momentum\", \"MOMENTUM\"]"),
            "strategies.enabled"
        );
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert_eq!(
            rejected_field("[providers.yahoo]\nchart_url = \"not a url\""),
            "chart_url"
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Config::parse_toml("[orchestrator"),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }
}
