//! Message bus that records every envelope it is asked to send.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::message::{Address, Envelope};
use crate::error::{Error, Result};
use crate::port::outbound::bus::{Inbox, MessageBus};

/// Records sends and forwards them to registered endpoints, if any.
///
/// Addresses passed to [`refuse`](Self::refuse) fail like an unregistered
/// endpoint on a real bus.
#[derive(Default)]
pub struct RecordingBus {
    sent: Mutex<Vec<(Address, Envelope)>>,
    endpoints: Mutex<HashMap<Address, mpsc::UnboundedSender<Envelope>>>,
    refused: Mutex<HashSet<Address>>,
}

impl RecordingBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `address` fail.
    pub fn refuse(&self, address: Address) {
        self.refused.lock().insert(address);
    }

    /// Everything sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<(Address, Envelope)> {
        self.sent.lock().clone()
    }

    /// Drain everything sent so far.
    pub fn take(&self) -> Vec<(Address, Envelope)> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl MessageBus for RecordingBus {
    fn register(&self, address: Address) -> Inbox {
        let (tx, rx) = mpsc::unbounded_channel();
        self.endpoints.lock().insert(address, tx);
        rx
    }

    fn deregister(&self, address: &Address) {
        self.endpoints.lock().remove(address);
    }

    fn send(&self, to: &Address, envelope: Envelope) -> Result<()> {
        if self.refused.lock().contains(to) {
            return Err(Error::Bus(format!("no endpoint registered for {to}")));
        }
        if let Some(endpoint) = self.endpoints.lock().get(to) {
            let _ = endpoint.send(envelope.clone());
        }
        self.sent.lock().push((to.clone(), envelope));
        Ok(())
    }
}
