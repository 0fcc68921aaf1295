//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators of the control loop: the
//! message bus, market data providers, strategy scorers and storage.

pub mod bus;
pub mod provider;
pub mod scorer;
pub mod store;
