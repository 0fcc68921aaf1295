//! Single owner of the strategy weight table.
//!
//! The [`WeightBook`] is a handle to a background task that holds every
//! strategy weight in memory and writes each change through to the
//! [`WeightStore`]. Reads and updates from the analysis path and the
//! maturation sweep are serialized through the task's command channel, so
//! two updates for the same strategy can never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::id::StrategyName;
use crate::domain::weight::{LearningRule, StrategyWeight, DEFAULT_INITIAL_WEIGHT};
use crate::error::{Error, Result};
use crate::port::outbound::store::WeightStore;

const COMMAND_BUFFER: usize = 64;

/// Configuration for the weight book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightBookConfig {
    /// Multiplicative update rule with its bounds.
    pub rule: LearningRule,
    /// Weight for strategies never seen before.
    pub initial_weight: f64,
}

impl Default for WeightBookConfig {
    fn default() -> Self {
        Self {
            rule: LearningRule::default(),
            initial_weight: DEFAULT_INITIAL_WEIGHT,
        }
    }
}

enum Command {
    Weights {
        names: Vec<StrategyName>,
        reply: oneshot::Sender<HashMap<StrategyName, f64>>,
    },
    Update {
        name: StrategyName,
        score: f64,
        at: DateTime<Utc>,
        reply: oneshot::Sender<Result<StrategyWeight>>,
    },
    All {
        reply: oneshot::Sender<Vec<StrategyWeight>>,
    },
}

/// Cloneable handle to the weight owner task.
#[derive(Clone)]
pub struct WeightBook {
    commands: mpsc::Sender<Command>,
}

impl WeightBook {
    /// Seed `strategies` at the initial weight (keeping stored weights),
    /// load the table and spawn the owner task.
    ///
    /// The task stops once every handle has been dropped.
    ///
    /// # Errors
    /// Returns an error if seeding or loading from the store fails.
    pub async fn start<S>(
        store: Arc<S>,
        config: WeightBookConfig,
        strategies: &[StrategyName],
    ) -> Result<(Self, JoinHandle<()>)>
    where
        S: WeightStore + 'static,
    {
        let now = Utc::now();
        for name in strategies {
            let seeded = store.seed_weight(name, config.initial_weight, now).await?;
            if seeded.is_inserted() {
                debug!(strategy = %name, weight = config.initial_weight, "Seeded strategy weight");
            }
        }

        let weights: HashMap<StrategyName, StrategyWeight> = store
            .load_weights()
            .await?
            .into_iter()
            .map(|w| (w.strategy.clone(), w))
            .collect();
        info!(strategies = weights.len(), "Strategy weights loaded");

        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let owner = Owner {
            store,
            config,
            weights,
        };
        let handle = tokio::spawn(owner.run(receiver));

        Ok((Self { commands }, handle))
    }

    /// Current weights for `names`. Unknown names read as the initial weight.
    ///
    /// # Errors
    /// Returns [`Error::Stopped`] if the owner task is gone.
    pub async fn weights_for(&self, names: &[StrategyName]) -> Result<HashMap<StrategyName, f64>> {
        let (reply, response) = oneshot::channel();
        self.request(Command::Weights {
            names: names.to_vec(),
            reply,
        })
        .await?;
        response.await.map_err(|_| stopped())
    }

    /// Current weight for one strategy.
    ///
    /// # Errors
    /// Returns [`Error::Stopped`] if the owner task is gone.
    pub async fn weight(&self, name: &StrategyName) -> Result<f64> {
        let weights = self.weights_for(std::slice::from_ref(name)).await?;
        Ok(weights.get(name).copied().unwrap_or_default())
    }

    /// Apply one performance score and persist the result.
    ///
    /// # Errors
    /// Returns an error if the store write fails (the in-memory weight is
    /// left unchanged) or the owner task is gone.
    pub async fn update_weight(
        &self,
        name: &StrategyName,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<StrategyWeight> {
        let (reply, response) = oneshot::channel();
        self.request(Command::Update {
            name: name.clone(),
            score,
            at,
            reply,
        })
        .await?;
        response.await.map_err(|_| stopped())?
    }

    /// Every weight the book holds, ordered by strategy name.
    ///
    /// # Errors
    /// Returns [`Error::Stopped`] if the owner task is gone.
    pub async fn all(&self) -> Result<Vec<StrategyWeight>> {
        let (reply, response) = oneshot::channel();
        self.request(Command::All { reply }).await?;
        response.await.map_err(|_| stopped())
    }

    async fn request(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| stopped())
    }
}

fn stopped() -> Error {
    Error::Stopped("weight book")
}

struct Owner<S> {
    store: Arc<S>,
    config: WeightBookConfig,
    weights: HashMap<StrategyName, StrategyWeight>,
}

impl<S: WeightStore> Owner<S> {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Weights { names, reply } => {
                    let _ = reply.send(self.lookup(names));
                }
                Command::Update {
                    name,
                    score,
                    at,
                    reply,
                } => {
                    let _ = reply.send(self.update(name, score, at).await);
                }
                Command::All { reply } => {
                    let mut all: Vec<_> = self.weights.values().cloned().collect();
                    all.sort_by(|a, b| a.strategy.cmp(&b.strategy));
                    let _ = reply.send(all);
                }
            }
        }
        debug!("Weight book stopped");
    }

    fn current(&self, name: &StrategyName) -> f64 {
        self.weights
            .get(name)
            .map_or(self.config.initial_weight, |w| w.weight)
    }

    fn lookup(&self, names: Vec<StrategyName>) -> HashMap<StrategyName, f64> {
        names
            .into_iter()
            .map(|name| {
                let weight = self.current(&name);
                (name, weight)
            })
            .collect()
    }

    async fn update(
        &mut self,
        name: StrategyName,
        score: f64,
        at: DateTime<Utc>,
    ) -> Result<StrategyWeight> {
        let before = self.current(&name);
        let after = self.config.rule.apply(before, score);
        let updated = StrategyWeight {
            strategy: name.clone(),
            weight: after,
            performance_score: Some(score),
            updated_at: at,
        };

        if let Err(error) = self.store.save_weight(&updated).await {
            warn!(strategy = %name, error = %error, "Failed to persist strategy weight");
            return Err(error);
        }

        info!(
            strategy = %name,
            score,
            before,
            after,
            "Strategy weight updated"
        );
        self.weights.insert(name, updated.clone());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::store::MemoryStore;

    const EPS: f64 = 1e-12;

    fn names(list: &[&str]) -> Vec<StrategyName> {
        list.iter().map(|n| StrategyName::new(*n)).collect()
    }

    #[tokio::test]
    async fn start_seeds_missing_strategies_only() {
        let store = Arc::new(MemoryStore::new());
        let existing = StrategyWeight {
            strategy: StrategyName::new("momentum"),
            weight: 1.7,
            performance_score: Some(0.3),
            updated_at: Utc::now(),
        };
        store.save_weight(&existing).await.unwrap();

        let (book, _task) = WeightBook::start(
            Arc::clone(&store),
            WeightBookConfig::default(),
            &names(&["momentum", "mean_reversion"]),
        )
        .await
        .unwrap();

        let weights = book
            .weights_for(&names(&["momentum", "mean_reversion", "unknown"]))
            .await
            .unwrap();
        assert_eq!(weights[&StrategyName::new("momentum")], 1.7);
        assert_eq!(weights[&StrategyName::new("mean_reversion")], 1.0);
        assert_eq!(weights[&StrategyName::new("unknown")], 1.0);
        assert_eq!(store.load_weights().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_applies_rule_and_writes_through() {
        let store = Arc::new(MemoryStore::new());
        let (book, _task) = WeightBook::start(
            Arc::clone(&store),
            WeightBookConfig::default(),
            &names(&["momentum"]),
        )
        .await
        .unwrap();
        let name = StrategyName::new("momentum");

        let updated = book.update_weight(&name, 0.10, Utc::now()).await.unwrap();
        assert!((updated.weight - 1.01).abs() < EPS);
        assert_eq!(updated.performance_score, Some(0.10));

        assert!((book.weight(&name).await.unwrap() - 1.01).abs() < EPS);
        let stored = store.load_weights().await.unwrap();
        assert!((stored[0].weight - 1.01).abs() < EPS);
    }

    #[tokio::test]
    async fn repeated_updates_stay_within_bounds() {
        let store = Arc::new(MemoryStore::new());
        let (book, _task) =
            WeightBook::start(store, WeightBookConfig::default(), &names(&["a"]))
                .await
                .unwrap();
        let name = StrategyName::new("a");

        for _ in 0..50 {
            book.update_weight(&name, 5.0, Utc::now()).await.unwrap();
        }
        assert_eq!(book.weight(&name).await.unwrap(), 2.0);

        for _ in 0..80 {
            book.update_weight(&name, -5.0, Utc::now()).await.unwrap();
        }
        assert_eq!(book.weight(&name).await.unwrap(), 0.1);
    }

    #[tokio::test]
    async fn failed_write_leaves_weight_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let (book, _task) = WeightBook::start(
            Arc::clone(&store),
            WeightBookConfig::default(),
            &names(&["a"]),
        )
        .await
        .unwrap();
        let name = StrategyName::new("a");

        store.fail_writes(true);
        assert!(book.update_weight(&name, 1.0, Utc::now()).await.is_err());
        assert_eq!(book.weight(&name).await.unwrap(), 1.0);
    }

    #[tokio::test]
    async fn all_lists_weights_in_name_order() {
        let store = Arc::new(MemoryStore::new());
        let (book, _task) = WeightBook::start(
            store,
            WeightBookConfig::default(),
            &names(&["sentiment_momentum", "momentum"]),
        )
        .await
        .unwrap();

        let all = book.all().await.unwrap();
        let order: Vec<_> = all.iter().map(|w| w.strategy.as_str()).collect();
        assert_eq!(order, vec!["momentum", "sentiment_momentum"]);
    }
}
