//! Strategy configuration.

use serde::Deserialize;

use crate::adapter::outbound::strategy::mean_reversion::MeanReversionConfig;
use crate::adapter::outbound::strategy::momentum::MomentumConfig;
use crate::adapter::outbound::strategy::registry::KNOWN_STRATEGIES;
use crate::adapter::outbound::strategy::sentiment_momentum::SentimentMomentumConfig;

/// Configuration for all strategy scorers.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategiesConfig {
    /// Enabled strategy names.
    #[serde(default = "default_enabled_strategies")]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub momentum: MomentumConfig,

    #[serde(default)]
    pub mean_reversion: MeanReversionConfig,

    #[serde(default)]
    pub sentiment_momentum: SentimentMomentumConfig,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_strategies(),
            momentum: MomentumConfig::default(),
            mean_reversion: MeanReversionConfig::default(),
            sentiment_momentum: SentimentMomentumConfig::default(),
        }
    }
}

fn default_enabled_strategies() -> Vec<String> {
    KNOWN_STRATEGIES.iter().map(ToString::to_string).collect()
}

/// Normalize a configured strategy name: trimmed, lower case, `-` as `_`.
#[must_use]
pub fn normalize_strategy_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace('-', "_")
}
