//! Bus endpoint serving one strategy scorer.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::message::{Address, AnalysisRequest, Envelope, Message, StrategyResponse};
use crate::domain::prediction::Assessment;
use crate::port::outbound::bus::{Inbox, MessageBus};
use crate::port::outbound::scorer::StrategyScorer;

/// Answers [`AnalysisRequest`]s on `strategy.<name>`.
pub struct StrategyEndpoint {
    scorer: Arc<dyn StrategyScorer>,
    bus: Arc<dyn MessageBus>,
    address: Address,
}

impl StrategyEndpoint {
    #[must_use]
    pub fn new(scorer: Arc<dyn StrategyScorer>, bus: Arc<dyn MessageBus>) -> Self {
        let address = Address::strategy(&scorer.name());
        Self {
            scorer,
            bus,
            address,
        }
    }

    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Assess one request.
    ///
    /// Short histories and scorer errors become zero-confidence holds so
    /// the requester always gets an answer.
    #[must_use]
    pub fn assess(&self, request: &AnalysisRequest) -> Assessment {
        let name = self.scorer.name();
        if request.historical_data.len() < self.scorer.min_history() {
            debug!(
                strategy = %name,
                asset = %request.asset_id,
                have = request.historical_data.len(),
                need = self.scorer.min_history(),
                "Not enough history"
            );
            return Assessment::abstain(format!(
                "Insufficient historical data for {} analysis",
                name.as_str().replace('_', " ")
            ));
        }
        match self.scorer.score(request) {
            Ok(assessment) => assessment,
            Err(err) => {
                warn!(strategy = %name, asset = %request.asset_id, error = %err, "Strategy failed");
                Assessment::abstain(format!("Error occurred: {err}"))
            }
        }
    }

    /// Build the reply for one request.
    #[must_use]
    pub fn respond(&self, request: &AnalysisRequest) -> StrategyResponse {
        let assessment = self.assess(request);
        StrategyResponse {
            cycle: request.cycle.clone(),
            asset_id: request.asset_id.clone(),
            timestamp: request.timestamp,
            strategy_name: self.scorer.name(),
            prediction: assessment.prediction,
            confidence: assessment.confidence,
            rationale: assessment.rationale,
        }
    }

    /// Serve requests arriving on `inbox` until it closes.
    pub fn spawn(self, mut inbox: Inbox) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(Envelope { from, message }) = inbox.recv().await {
                let request = match message {
                    Message::AnalysisRequest(request) => request,
                    other => {
                        debug!(strategy = %self.address, kind = other.kind(), "Strategy endpoint ignoring message");
                        continue;
                    }
                };
                let response = self.respond(&request);
                let reply = Envelope::new(
                    self.address.clone(),
                    Message::StrategyResponse(response),
                );
                if let Err(err) = self.bus.send(&from, reply) {
                    warn!(strategy = %self.address, to = %from, error = %err, "Failed to deliver strategy reply");
                }
            }
        })
    }
}
