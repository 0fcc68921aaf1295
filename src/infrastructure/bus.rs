//! In-process message bus.
//!
//! Endpoints are unbounded mpsc channels keyed by address in a concurrent
//! map. Sends never block; an envelope for an address nobody registered
//! (or whose receiver was dropped) fails with [`Error::Bus`].

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;

use crate::domain::message::{Address, Envelope};
use crate::error::{Error, Result};
use crate::port::outbound::bus::{Inbox, MessageBus};

#[derive(Default)]
pub struct LocalBus {
    endpoints: DashMap<Address, mpsc::UnboundedSender<Envelope>>,
}

impl LocalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl MessageBus for LocalBus {
    fn register(&self, address: Address) -> Inbox {
        let (tx, rx) = mpsc::unbounded_channel();
        self.endpoints.insert(address, tx);
        rx
    }

    fn deregister(&self, address: &Address) {
        self.endpoints.remove(address);
    }

    fn send(&self, to: &Address, envelope: Envelope) -> Result<()> {
        let kind = envelope.message.kind();
        let Some(endpoint) = self.endpoints.get(to) else {
            return Err(Error::Bus(format!("no endpoint registered for {to}")));
        };
        endpoint
            .send(envelope)
            .map_err(|_| Error::Bus(format!("endpoint {to} has shut down")))?;
        trace!(to = %to, kind, "Envelope queued");
        Ok(())
    }
}
