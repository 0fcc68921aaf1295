//! Control loop lifecycle.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::application::orchestration::orchestrator::Orchestrator;
use crate::application::weight::book::WeightBook;
use crate::domain::message::Address;
use crate::error::Result;
use crate::infrastructure::bootstrap::{
    build_providers, build_strategy_registry, open_store, spawn_endpoints,
};
use crate::infrastructure::bus::LocalBus;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::bus::MessageBus;

/// Run the control loop against `database` until `shutdown` flips to true.
///
/// # Errors
///
/// Returns an error if the store, providers or weight book cannot be
/// initialized, or the loop itself fails.
pub async fn run_with_shutdown(
    config: Config,
    database: &str,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    info!(
        provider = %config.providers.source,
        strategies = ?config.enabled_strategies(),
        "Starting augury"
    );

    let store = open_store(database)?;
    let strategies = build_strategy_registry(&config);
    let names = strategies.names();
    let (weights, weight_task) =
        WeightBook::start(Arc::clone(&store), config.weight_book(), &names).await?;

    let bus: Arc<dyn MessageBus> = Arc::new(LocalBus::new());
    let providers = build_providers(&config.providers)?;
    let endpoints = spawn_endpoints(&bus, providers, &strategies, config.provider_timeout());

    let inbox = bus.register(Address::orchestrator());
    let orchestrator = Orchestrator::new(
        config.orchestrator_config(),
        store,
        Arc::clone(&bus),
        weights,
        names,
    );
    let result = orchestrator.run(inbox, shutdown).await;

    for endpoint in &endpoints {
        endpoint.abort();
    }
    futures_util::future::join_all(endpoints).await;
    bus.deregister(&Address::orchestrator());
    // The weight book task ends once every handle is dropped.
    let _ = weight_task.await;
    info!("augury stopped");
    result
}
