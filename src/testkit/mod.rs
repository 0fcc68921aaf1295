//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`]: `MemoryStore`, an in-memory implementation of every store port.
//! - [`bus`]: `RecordingBus`, which records sends and can refuse addresses.
//! - [`provider`]: fixed and failing price and sentiment providers.
//! - [`scorer`]: `FixedScorer`, a scripted strategy.
//! - [`domain`]: builders for snapshots, predictions and bus replies.
//! - [`config`]: canonical test configurations.

pub mod bus;
pub mod config;
pub mod domain;
pub mod provider;
pub mod scorer;
pub mod store;
