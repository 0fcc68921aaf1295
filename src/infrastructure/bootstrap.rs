//! Composition root: builds the store, providers, strategies and bus
//! endpoints from configuration.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::adapter::outbound::provider::endpoint::{PriceEndpoint, SentimentEndpoint};
use crate::adapter::outbound::provider::settings::{ProviderConfig, ProviderSource};
use crate::adapter::outbound::provider::simulated::SimulatedProvider;
use crate::adapter::outbound::provider::yahoo::YahooClient;
use crate::adapter::outbound::sqlite::store::SqliteStore;
use crate::adapter::outbound::strategy::endpoint::StrategyEndpoint;
use crate::adapter::outbound::strategy::registry::StrategyRegistry;
use crate::domain::message::Address;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::strategy::normalize_strategy_name;
use crate::port::outbound::bus::MessageBus;
use crate::port::outbound::provider::{PriceProvider, SentimentProvider};

/// Open (and migrate) the SQLite store.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn open_store(database: &str) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(database)?;
    info!(database, "Database initialized");
    Ok(Arc::new(store))
}

/// Build the strategy registry from configuration.
///
/// Unknown strategy names are logged and skipped.
#[must_use]
pub fn build_strategy_registry(config: &Config) -> StrategyRegistry {
    let mut builder = StrategyRegistry::builder();

    for name in &config.strategies.enabled {
        let normalized = normalize_strategy_name(name);
        match normalized.as_str() {
            "momentum" => {
                builder = builder.momentum(config.strategies.momentum.clone());
            }
            "mean_reversion" => {
                builder = builder.mean_reversion(config.strategies.mean_reversion.clone());
            }
            "sentiment_momentum" => {
                builder = builder.sentiment_momentum(config.strategies.sentiment_momentum.clone());
            }
            unknown => {
                warn!(
                    strategy = name,
                    normalized_strategy = unknown,
                    "Unknown strategy in config, skipping"
                );
            }
        }
    }

    builder.build()
}

/// Price and sentiment providers for the configured source.
pub struct Providers {
    pub price: Arc<dyn PriceProvider>,
    pub sentiment: Arc<dyn SentimentProvider>,
}

/// Build the configured market data providers.
///
/// # Errors
/// Returns an error if the Yahoo endpoint URLs do not parse.
pub fn build_providers(config: &ProviderConfig) -> Result<Providers> {
    match config.source {
        ProviderSource::Yahoo => {
            let client = Arc::new(YahooClient::from_config(&config.yahoo)?);
            Ok(Providers {
                price: client.clone(),
                sentiment: client,
            })
        }
        ProviderSource::Simulated => {
            let simulated = Arc::new(SimulatedProvider::new(config.simulated.clone()));
            Ok(Providers {
                price: simulated.clone(),
                sentiment: simulated,
            })
        }
    }
}

/// Register and spawn the provider and strategy endpoints on `bus`.
pub fn spawn_endpoints(
    bus: &Arc<dyn MessageBus>,
    providers: Providers,
    strategies: &StrategyRegistry,
    provider_timeout: Duration,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::with_capacity(strategies.len() + 2);

    let inbox = bus.register(Address::price_provider());
    handles.push(PriceEndpoint::new(providers.price, Arc::clone(bus), provider_timeout).spawn(inbox));

    let inbox = bus.register(Address::sentiment_provider());
    handles.push(
        SentimentEndpoint::new(providers.sentiment, Arc::clone(bus), provider_timeout).spawn(inbox),
    );

    for scorer in strategies.scorers() {
        let endpoint = StrategyEndpoint::new(Arc::clone(scorer), Arc::clone(bus));
        let inbox = bus.register(endpoint.address().clone());
        handles.push(endpoint.spawn(inbox));
    }

    info!(
        endpoints = handles.len(),
        strategies = strategies.len(),
        "Endpoints started"
    );
    handles
}
