//! Registry of enabled strategy scorers.

use std::sync::Arc;

use super::mean_reversion::{self, MeanReversionConfig, MeanReversionStrategy};
use super::momentum::{self, MomentumConfig, MomentumStrategy};
use super::sentiment_momentum::{self, SentimentMomentumConfig, SentimentMomentumStrategy};
use crate::domain::id::StrategyName;
use crate::port::outbound::scorer::StrategyScorer;

/// Every strategy name the registry can build, in registration order.
pub const KNOWN_STRATEGIES: [&str; 3] = [momentum::NAME, mean_reversion::NAME, sentiment_momentum::NAME];

/// One-line description of a known strategy.
#[must_use]
pub fn describe(name: &str) -> Option<&'static str> {
    match name {
        momentum::NAME => Some("Blended 10/30/90-day price momentum"),
        mean_reversion::NAME => Some("Z-score distance from the 30-day mean"),
        sentiment_momentum::NAME => Some("News sentiment confirmed by 5-day price momentum"),
        _ => None,
    }
}

/// Registry of enabled strategies.
///
/// Use [`StrategyRegistryBuilder`] for construction from config.
#[derive(Default)]
pub struct StrategyRegistry {
    scorers: Vec<Arc<dyn StrategyScorer>>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::new()
    }

    /// Register a scorer. A scorer with the same name replaces the earlier one.
    pub fn register(&mut self, scorer: Arc<dyn StrategyScorer>) {
        let name = scorer.name();
        self.scorers.retain(|s| s.name() != name);
        self.scorers.push(scorer);
    }

    #[must_use]
    pub fn scorers(&self) -> &[Arc<dyn StrategyScorer>] {
        &self.scorers
    }

    #[must_use]
    pub fn names(&self) -> Vec<StrategyName> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

/// Builder for a [`StrategyRegistry`].
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    momentum: Option<MomentumConfig>,
    mean_reversion: Option<MeanReversionConfig>,
    sentiment_momentum: Option<SentimentMomentumConfig>,
}

impl StrategyRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn momentum(mut self, config: MomentumConfig) -> Self {
        self.momentum = Some(config);
        self
    }

    #[must_use]
    pub fn mean_reversion(mut self, config: MeanReversionConfig) -> Self {
        self.mean_reversion = Some(config);
        self
    }

    #[must_use]
    pub fn sentiment_momentum(mut self, config: SentimentMomentumConfig) -> Self {
        self.sentiment_momentum = Some(config);
        self
    }

    #[must_use]
    pub fn build(self) -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        if let Some(config) = self.momentum {
            registry.register(Arc::new(MomentumStrategy::new(config)));
        }
        if let Some(config) = self.mean_reversion {
            registry.register(Arc::new(MeanReversionStrategy::new(config)));
        }
        if let Some(config) = self.sentiment_momentum {
            registry.register(Arc::new(SentimentMomentumStrategy::new(config)));
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_enabled_strategies_in_order() {
        let registry = StrategyRegistry::builder()
            .sentiment_momentum(SentimentMomentumConfig::default())
            .momentum(MomentumConfig::default())
            .build();

        let names: Vec<String> = registry.names().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["momentum", "sentiment_momentum"]);
    }

    #[test]
    fn empty_builder_builds_empty_registry() {
        assert!(StrategyRegistry::builder().build().is_empty());
    }

    #[test]
    fn every_known_strategy_is_described() {
        for name in KNOWN_STRATEGIES {
            assert!(describe(name).is_some(), "{name}");
        }
        assert!(describe("arbitrage").is_none());
    }
}
