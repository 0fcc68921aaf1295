//! Bus endpoints for the price and sentiment providers.
//!
//! Each request is answered on its own task so a slow lookup for one
//! ticker never delays another. Every lookup runs under a timeout; errors
//! and timeouts are answered with [`Message::ProviderFailed`] so the
//! requester can release the asset's pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::id::AssetId;
use crate::domain::message::{
    Address, Envelope, Message, PriceRequest, ProviderFailure, SentimentRequest,
    SentimentResponse, Stage,
};
use crate::error::{Error, Result};
use crate::port::outbound::bus::{Inbox, MessageBus};
use crate::port::outbound::provider::{PriceProvider, SentimentProvider};

async fn within<T>(timeout: Duration, lookup: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(timeout, lookup).await {
        Ok(result) => result,
        Err(_) => Err(Error::Provider(format!("timed out after {}s", timeout.as_secs_f64()))),
    }
}

fn failure(provider: &str, ticker: AssetId, stage: Stage, err: &Error) -> Message {
    warn!(provider, asset = %ticker, stage = %stage, error = %err, "Provider lookup failed");
    Message::ProviderFailed(ProviderFailure {
        ticker,
        stage,
        reason: err.to_string(),
    })
}

fn reply(bus: &dyn MessageBus, from: Address, to: &Address, message: Message) {
    if let Err(err) = bus.send(to, Envelope::new(from, message)) {
        warn!(to = %to, error = %err, "Failed to deliver provider reply");
    }
}

/// Answers [`PriceRequest`]s.
pub struct PriceEndpoint {
    provider: Arc<dyn PriceProvider>,
    bus: Arc<dyn MessageBus>,
    timeout: Duration,
}

impl PriceEndpoint {
    #[must_use]
    pub fn new(provider: Arc<dyn PriceProvider>, bus: Arc<dyn MessageBus>, timeout: Duration) -> Self {
        Self {
            provider,
            bus,
            timeout,
        }
    }

    /// Serve requests arriving on `inbox` until it closes.
    pub fn spawn(self, mut inbox: Inbox) -> JoinHandle<()> {
        let endpoint = Arc::new(self);
        tokio::spawn(async move {
            while let Some(Envelope { from, message }) = inbox.recv().await {
                match message {
                    Message::PriceRequest(request) => {
                        let endpoint = Arc::clone(&endpoint);
                        tokio::spawn(async move { endpoint.answer(&from, request).await });
                    }
                    other => debug!(kind = other.kind(), "Price endpoint ignoring message"),
                }
            }
        })
    }

    /// Look up one price and send the reply to `reply_to`.
    pub async fn answer(&self, reply_to: &Address, request: PriceRequest) {
        let message = match within(self.timeout, self.provider.price(&request.ticker)).await {
            Ok(response) => Message::PriceResponse(response),
            Err(err) => failure(self.provider.name(), request.ticker, Stage::Price, &err),
        };
        reply(self.bus.as_ref(), Address::price_provider(), reply_to, message);
    }
}

/// Answers [`SentimentRequest`]s, echoing the request timestamp.
pub struct SentimentEndpoint {
    provider: Arc<dyn SentimentProvider>,
    bus: Arc<dyn MessageBus>,
    timeout: Duration,
}

impl SentimentEndpoint {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SentimentProvider>,
        bus: Arc<dyn MessageBus>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            bus,
            timeout,
        }
    }

    pub fn spawn(self, mut inbox: Inbox) -> JoinHandle<()> {
        let endpoint = Arc::new(self);
        tokio::spawn(async move {
            while let Some(Envelope { from, message }) = inbox.recv().await {
                match message {
                    Message::SentimentRequest(request) => {
                        let endpoint = Arc::clone(&endpoint);
                        tokio::spawn(async move { endpoint.answer(&from, request).await });
                    }
                    other => debug!(kind = other.kind(), "Sentiment endpoint ignoring message"),
                }
            }
        })
    }

    pub async fn answer(&self, reply_to: &Address, request: SentimentRequest) {
        let message = match within(self.timeout, self.provider.sentiment(&request.ticker)).await {
            Ok(reading) => Message::SentimentResponse(SentimentResponse::new(
                request.ticker,
                request.timestamp,
                reading,
            )),
            Err(err) => failure(self.provider.name(), request.ticker, Stage::Sentiment, &err),
        };
        reply(self.bus.as_ref(), Address::sentiment_provider(), reply_to, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::SentimentReading;
    use crate::testkit::bus::RecordingBus;
    use crate::testkit::provider::{FailingProvider, FixedPriceProvider, FixedSentimentProvider};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn only_reply(bus: &RecordingBus) -> (Address, Envelope) {
        let mut sent = bus.take();
        assert_eq!(sent.len(), 1);
        sent.remove(0)
    }

    #[tokio::test]
    async fn price_reply_goes_to_requester() {
        let bus = Arc::new(RecordingBus::new());
        let endpoint = PriceEndpoint::new(
            Arc::new(FixedPriceProvider::new(dec!(187.25))),
            bus.clone(),
            Duration::from_secs(1),
        );

        endpoint
            .answer(&Address::orchestrator(), PriceRequest { ticker: AssetId::new("AAPL") })
            .await;

        let (to, envelope) = only_reply(&bus);
        assert_eq!(to, Address::orchestrator());
        assert_eq!(envelope.from, Address::price_provider());
        match envelope.message {
            Message::PriceResponse(response) => assert_eq!(response.price, dec!(187.25)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_error_replies_failure() {
        let bus = Arc::new(RecordingBus::new());
        let endpoint = PriceEndpoint::new(
            Arc::new(FailingProvider::new("upstream down")),
            bus.clone(),
            Duration::from_secs(1),
        );

        endpoint
            .answer(&Address::orchestrator(), PriceRequest { ticker: AssetId::new("AAPL") })
            .await;

        match only_reply(&bus).1.message {
            Message::ProviderFailed(failure) => {
                assert_eq!(failure.stage, Stage::Price);
                assert!(failure.reason.contains("upstream down"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let bus = Arc::new(RecordingBus::new());
        let endpoint = PriceEndpoint::new(
            Arc::new(FixedPriceProvider::new(dec!(1)).with_delay(Duration::from_secs(60))),
            bus.clone(),
            Duration::from_secs(15),
        );

        endpoint
            .answer(&Address::orchestrator(), PriceRequest { ticker: AssetId::new("AAPL") })
            .await;

        match only_reply(&bus).1.message {
            Message::ProviderFailed(failure) => assert!(failure.reason.contains("timed out")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn sentiment_reply_echoes_request_timestamp() {
        let bus = Arc::new(RecordingBus::new());
        let reading = SentimentReading::try_new(0.4, 0.4, 3).unwrap();
        let endpoint = SentimentEndpoint::new(
            Arc::new(FixedSentimentProvider::new(reading)),
            bus.clone(),
            Duration::from_secs(1),
        );
        let at = Utc::now();

        endpoint
            .answer(
                &Address::orchestrator(),
                SentimentRequest {
                    ticker: AssetId::new("AAPL"),
                    timestamp: at,
                },
            )
            .await;

        let (_, envelope) = only_reply(&bus);
        assert_eq!(envelope.from, Address::sentiment_provider());
        match envelope.message {
            Message::SentimentResponse(response) => {
                assert_eq!(response.timestamp, at);
                assert_eq!(response.reading().unwrap(), reading);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawned_endpoint_serves_its_inbox() {
        let bus = Arc::new(RecordingBus::new());
        let mut replies = bus.register(Address::orchestrator());
        let inbox = bus.register(Address::price_provider());
        let handle = PriceEndpoint::new(
            Arc::new(FixedPriceProvider::new(dec!(10))),
            bus.clone(),
            Duration::from_secs(1),
        )
        .spawn(inbox);

        bus.send(
            &Address::price_provider(),
            Envelope::new(
                Address::orchestrator(),
                Message::PriceRequest(PriceRequest { ticker: AssetId::new("MSFT") }),
            ),
        )
        .unwrap();

        let envelope = replies.recv().await.unwrap();
        assert!(matches!(envelope.message, Message::PriceResponse(_)));
        handle.abort();
    }
}
