//! Message bus port.

use tokio::sync::mpsc;

use crate::domain::message::{Address, Envelope};
use crate::error::Result;

/// Receiving half handed to an endpoint when it registers.
pub type Inbox = mpsc::UnboundedReceiver<Envelope>;

/// Delivers envelopes between named endpoints.
///
/// Delivery is best-effort: a send succeeds once the envelope is queued
/// for the target, not once it has been handled. Nothing orders messages
/// of different kinds relative to each other.
pub trait MessageBus: Send + Sync {
    /// Register an endpoint, replacing any previous registration.
    fn register(&self, address: Address) -> Inbox;

    /// Remove an endpoint.
    fn deregister(&self, address: &Address);

    /// Queue an envelope for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`](crate::error::Error::Bus) if no endpoint is
    /// registered under `to` or it has shut down.
    fn send(&self, to: &Address, envelope: Envelope) -> Result<()>;
}
