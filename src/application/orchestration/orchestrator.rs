//! The periodic control loop.
//!
//! Every tick walks the tracked assets. For each one the maturation sweep
//! runs first, then a fresh pipeline asks for a price, then sentiment for
//! the same snapshot key, then fans an analysis request out to every
//! strategy. Replies are matched to their cycle through the
//! [`CorrelationMap`]; a cycle closes when all strategies answered or its
//! grace deadline passes, and the decision engine turns the collected votes
//! into one persisted decision.
//!
//! All state lives in the loop task. Handlers run one at a time, so
//! pipelines for different assets interleave only at message boundaries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::config::OrchestratorConfig;
use super::correlation::{CorrelationMap, ReplyOutcome};
use super::pipeline::PipelineState;
use crate::application::decision::engine::DecisionEngine;
use crate::application::performance::sweep::MaturationSweep;
use crate::application::weight::book::WeightBook;
use crate::domain::decision::Vote;
use crate::domain::id::{AssetId, CycleId, StrategyName};
use crate::domain::message::{
    Address, AnalysisRequest, Envelope, Message, PriceRequest, PriceResponse, ProviderFailure,
    SentimentRequest, SentimentResponse, Stage, StrategyResponse,
};
use crate::domain::prediction::Prediction;
use crate::domain::snapshot::{key_timestamp, Snapshot};
use crate::error::Result;
use crate::port::outbound::bus::{Inbox, MessageBus};
use crate::port::outbound::store::{Insertion, Store};

/// Drives per-asset pipelines and the maturation sweep.
pub struct Orchestrator<S> {
    config: OrchestratorConfig,
    address: Address,
    store: Arc<S>,
    bus: Arc<dyn MessageBus>,
    weights: WeightBook,
    engine: DecisionEngine,
    sweep: MaturationSweep<S>,
    strategies: Vec<StrategyName>,
    pipelines: HashMap<AssetId, PipelineState>,
    cycles: CorrelationMap,
}

impl<S: Store + 'static> Orchestrator<S> {
    /// Create an orchestrator fanning out to `strategies`.
    #[must_use]
    pub fn new(
        config: OrchestratorConfig,
        store: Arc<S>,
        bus: Arc<dyn MessageBus>,
        weights: WeightBook,
        strategies: Vec<StrategyName>,
    ) -> Self {
        let sweep = MaturationSweep::new(Arc::clone(&store), weights.clone(), config.feedback);
        Self {
            config,
            address: Address::orchestrator(),
            store,
            bus,
            weights,
            engine: DecisionEngine::new(config.decision),
            sweep,
            strategies,
            pipelines: HashMap::new(),
            cycles: CorrelationMap::new(),
        }
    }

    /// Current pipeline state for an asset.
    #[must_use]
    pub fn pipeline_state(&self, asset: &AssetId) -> Option<&PipelineState> {
        self.pipelines.get(asset)
    }

    /// Number of analysis cycles still collecting replies.
    #[must_use]
    pub fn open_cycles(&self) -> usize {
        self.cycles.len()
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first tick fires immediately.
    ///
    /// # Errors
    /// Currently never fails; per-asset errors are logged and isolated.
    pub async fn run(mut self, mut inbox: Inbox, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            interval_secs = self.config.cycle_interval.as_secs(),
            grace_secs = self.config.grace_period.as_secs(),
            strategies = self.strategies.len(),
            "Orchestrator started"
        );

        let mut ticker = tokio::time::interval(self.config.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let deadline = self.cycles.next_deadline();
            tokio::select! {
                result = shutdown.changed() => {
                    match result {
                        Ok(()) => {
                            if *shutdown.borrow() {
                                info!("Shutdown signal received");
                                break;
                            }
                        }
                        Err(_) => {
                            info!("Shutdown channel closed");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
                envelope = inbox.recv() => {
                    let Some(envelope) = envelope else {
                        warn!("Orchestrator inbox closed");
                        break;
                    };
                    self.handle(envelope).await;
                }
                () = wait_until(deadline) => {
                    self.close_expired(Instant::now()).await;
                }
            }
        }

        if !self.cycles.is_empty() {
            info!(open = self.cycles.len(), "Abandoning open analysis cycles");
        }
        Ok(())
    }

    /// Sweep and start a pipeline for every tracked asset.
    pub async fn tick(&mut self) {
        let now = Utc::now();
        let assets = match self.store.list_assets().await {
            Ok(assets) => assets,
            Err(e) => {
                error!(error = %e, "Failed to list assets; skipping tick");
                return;
            }
        };
        debug!(assets = assets.len(), "Tick");

        for asset in assets {
            let id = asset.id().clone();
            if let Err(e) = self.sweep.sweep(&id, now).await {
                warn!(asset = %id, error = %e, "Maturation sweep failed");
            }
            self.start_pipeline(id);
        }
    }

    /// Handle one inbound envelope.
    pub async fn handle(&mut self, envelope: Envelope) {
        let Envelope { from, message } = envelope;
        match message {
            Message::PriceResponse(reply) => self.on_price(reply, &from).await,
            Message::SentimentResponse(reply) => self.on_sentiment(reply).await,
            Message::StrategyResponse(reply) => self.on_strategy(reply).await,
            Message::ProviderFailed(failure) => self.on_provider_failed(&failure),
            other => {
                warn!(kind = other.kind(), from = %from, "Unexpected message for orchestrator");
            }
        }
    }

    /// Close every cycle whose grace deadline is at or before `now`.
    pub async fn close_expired(&mut self, now: Instant) {
        for cycle in self.cycles.expired(now) {
            self.finish(&cycle).await;
        }
    }

    fn start_pipeline(&mut self, asset: AssetId) {
        if let Some(previous) = self.pipelines.get(&asset) {
            if previous.awaiting_provider() {
                warn!(asset = %asset, state = %previous, "Pipeline superseded by new tick");
            }
        }

        let request = Envelope::new(
            self.address.clone(),
            Message::PriceRequest(PriceRequest {
                ticker: asset.clone(),
            }),
        );
        match self.bus.send(&Address::price_provider(), request) {
            Ok(()) => {
                self.pipelines.insert(asset, PipelineState::AwaitingPrice);
            }
            Err(e) => {
                warn!(asset = %asset, error = %e, "Price request not delivered");
                self.pipelines.remove(&asset);
            }
        }
    }

    async fn on_price(&mut self, reply: PriceResponse, from: &Address) {
        let asset = reply.ticker.clone();
        if self.pipelines.get(&asset) != Some(&PipelineState::AwaitingPrice) {
            debug!(asset = %asset, "Ignoring price reply outside awaiting_price");
            return;
        }

        let snapshot = match Snapshot::priced(
            asset.clone(),
            reply.timestamp,
            reply.price,
            reply.currency,
            reply.volume,
        ) {
            Ok(snapshot) => snapshot.sourced(from.as_str()),
            Err(e) => {
                warn!(asset = %asset, error = %e, "Rejected price reply");
                self.pipelines.remove(&asset);
                return;
            }
        };
        if let Err(e) = self.store.upsert_snapshot(&snapshot).await {
            error!(asset = %asset, error = %e, "Failed to store price snapshot");
            self.pipelines.remove(&asset);
            return;
        }

        let timestamp = snapshot.timestamp;
        let request = Envelope::new(
            self.address.clone(),
            Message::SentimentRequest(SentimentRequest {
                ticker: asset.clone(),
                timestamp,
            }),
        );
        match self.bus.send(&Address::sentiment_provider(), request) {
            Ok(()) => {
                debug!(asset = %asset, %timestamp, price = %reply.price, "Price stored");
                self.pipelines
                    .insert(asset, PipelineState::AwaitingSentiment { timestamp });
            }
            Err(e) => {
                warn!(asset = %asset, error = %e, "Sentiment request not delivered");
                self.pipelines.remove(&asset);
            }
        }
    }

    async fn on_sentiment(&mut self, reply: SentimentResponse) {
        let asset = reply.ticker.clone();
        let timestamp = key_timestamp(reply.timestamp);
        match self.pipelines.get(&asset) {
            Some(PipelineState::AwaitingSentiment { timestamp: expected })
                if *expected == timestamp => {}
            _ => {
                debug!(asset = %asset, %timestamp, "Ignoring sentiment reply for another snapshot");
                return;
            }
        }

        let reading = match reply.reading() {
            Ok(reading) => reading,
            Err(e) => {
                warn!(asset = %asset, error = %e, "Rejected sentiment reply");
                self.pipelines.remove(&asset);
                return;
            }
        };
        let snapshot = Snapshot::with_sentiment(asset.clone(), timestamp, reading);
        if let Err(e) = self.store.upsert_snapshot(&snapshot).await {
            error!(asset = %asset, error = %e, "Failed to store sentiment");
            self.pipelines.remove(&asset);
            return;
        }

        self.analyze(asset, timestamp).await;
    }

    async fn analyze(&mut self, asset: AssetId, timestamp: DateTime<Utc>) {
        let mut window = match self
            .store
            .recent_snapshots(&asset, self.config.history_window + 1)
            .await
        {
            Ok(window) if !window.is_empty() => window,
            Ok(_) => {
                warn!(asset = %asset, "No snapshots to analyze");
                self.pipelines.remove(&asset);
                return;
            }
            Err(e) => {
                error!(asset = %asset, error = %e, "Failed to load snapshot history");
                self.pipelines.remove(&asset);
                return;
            }
        };
        let current = window.remove(0);

        if self.strategies.is_empty() {
            self.decide(asset, timestamp, Vec::new(), None).await;
            return;
        }

        let cycle = CycleId::new();
        let deadline = Instant::now() + self.config.grace_period;
        self.cycles.open(
            cycle.clone(),
            asset.clone(),
            timestamp,
            self.strategies.iter().cloned(),
            deadline,
        );
        self.pipelines.insert(
            asset.clone(),
            PipelineState::Analyzing {
                cycle: cycle.clone(),
                timestamp,
            },
        );

        let history = window.len();
        let request = AnalysisRequest {
            cycle: cycle.clone(),
            asset_id: asset.clone(),
            timestamp,
            current_data: current,
            historical_data: window,
        };

        let mut undelivered = false;
        for strategy in &self.strategies {
            let envelope = Envelope::new(
                self.address.clone(),
                Message::AnalysisRequest(request.clone()),
            );
            if let Err(e) = self.bus.send(&Address::strategy(strategy), envelope) {
                warn!(asset = %asset, strategy = %strategy, error = %e, "Analysis request not delivered");
                undelivered |= self.cycles.forget(&cycle, strategy);
            }
        }
        info!(
            asset = %asset,
            cycle = %cycle,
            strategies = self.strategies.len(),
            history,
            "Analysis dispatched"
        );

        if undelivered {
            self.finish(&cycle).await;
        }
    }

    async fn on_strategy(&mut self, reply: StrategyResponse) {
        let outcome = self.cycles.record(&reply);
        match outcome {
            ReplyOutcome::Duplicate => {
                warn!(
                    asset = %reply.asset_id,
                    cycle = %reply.cycle,
                    strategy = %reply.strategy_name,
                    "Duplicate strategy reply ignored"
                );
                return;
            }
            ReplyOutcome::Mismatched => {
                warn!(
                    asset = %reply.asset_id,
                    cycle = %reply.cycle,
                    strategy = %reply.strategy_name,
                    "Strategy reply does not match its cycle"
                );
                return;
            }
            ReplyOutcome::Accepted { .. } | ReplyOutcome::Unknown => {}
        }

        self.persist_prediction(&reply).await;

        match outcome {
            ReplyOutcome::Accepted { complete: true } => self.finish(&reply.cycle).await,
            ReplyOutcome::Unknown => {
                info!(
                    asset = %reply.asset_id,
                    cycle = %reply.cycle,
                    strategy = %reply.strategy_name,
                    "Late strategy reply stored without counting"
                );
            }
            _ => {}
        }
    }

    async fn persist_prediction(&self, reply: &StrategyResponse) {
        let prediction = Prediction {
            id: None,
            asset_id: reply.asset_id.clone(),
            strategy: reply.strategy_name.clone(),
            timestamp: reply.timestamp,
            payload: reply.prediction.clone(),
            confidence: reply.confidence,
            rationale: reply.rationale.clone(),
        };
        match self.store.insert_prediction(&prediction).await {
            Ok(Insertion::Inserted) => {}
            Ok(Insertion::Duplicate) => {
                error!(
                    asset = %reply.asset_id,
                    strategy = %reply.strategy_name,
                    timestamp = %reply.timestamp,
                    "Prediction already stored for this snapshot; replies are being correlated twice"
                );
            }
            Err(e) => {
                error!(
                    asset = %reply.asset_id,
                    strategy = %reply.strategy_name,
                    error = %e,
                    "Failed to store prediction"
                );
            }
        }
    }

    fn on_provider_failed(&mut self, failure: &ProviderFailure) {
        let stalled = match self.pipelines.get(&failure.ticker) {
            Some(PipelineState::AwaitingPrice) => failure.stage == Stage::Price,
            Some(PipelineState::AwaitingSentiment { .. }) => failure.stage == Stage::Sentiment,
            _ => false,
        };
        if stalled {
            warn!(
                asset = %failure.ticker,
                stage = %failure.stage,
                reason = %failure.reason,
                "Provider failed; asset skipped until next tick"
            );
            self.pipelines.remove(&failure.ticker);
        } else {
            debug!(asset = %failure.ticker, stage = %failure.stage, "Ignoring stale provider failure");
        }
    }

    async fn finish(&mut self, cycle: &CycleId) {
        let Some(open) = self.cycles.close(cycle) else {
            return;
        };
        let missing: Vec<String> = open.pending().map(ToString::to_string).collect();
        if !missing.is_empty() {
            warn!(
                asset = %open.asset_id,
                cycle = %cycle,
                missing = ?missing,
                "Grace period elapsed; deciding without missing strategies"
            );
        }
        let asset = open.asset_id.clone();
        let timestamp = open.timestamp;
        self.decide(asset, timestamp, open.into_votes(), Some(cycle.clone()))
            .await;
    }

    async fn decide(
        &mut self,
        asset: AssetId,
        timestamp: DateTime<Utc>,
        votes: Vec<Vote>,
        cycle: Option<CycleId>,
    ) {
        let names: Vec<StrategyName> = votes.iter().map(|v| v.strategy.clone()).collect();
        let weights = match self.weights.weights_for(&names).await {
            Ok(weights) => weights,
            Err(e) => {
                error!(asset = %asset, error = %e, "Strategy weights unavailable; no decision");
                self.pipelines.remove(&asset);
                return;
            }
        };

        let decision = self.engine.decide(&asset, timestamp, &votes, &weights);
        match self.store.insert_decision(&decision).await {
            Ok(()) => info!(
                asset = %asset,
                action = %decision.action,
                confidence = decision.confidence.value(),
                votes = votes.len(),
                "Decision recorded"
            ),
            Err(e) => error!(asset = %asset, error = %e, "Failed to store decision"),
        }

        let owns_pipeline = match (&cycle, self.pipelines.get(&asset)) {
            (Some(cycle), Some(PipelineState::Analyzing { cycle: active, .. })) => cycle == active,
            (None, _) => true,
            _ => false,
        };
        if owns_pipeline {
            self.pipelines
                .insert(asset, PipelineState::Decided { timestamp });
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
