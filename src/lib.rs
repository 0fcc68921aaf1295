//! Augury - an adaptive ensemble of market strategies.
//!
//! Every tick the orchestrator gathers a price and a news sentiment reading
//! for each tracked asset, asks every enabled strategy for a buy, sell or
//! hold call, and combines the answers into one decision weighted by how
//! much each strategy is currently trusted. Once a prediction is old enough
//! to check against the market, its outcome nudges that trust up or down.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types and rules: snapshots, predictions, decisions,
//!   weights and the learning rule
//! - [`port`] - Traits at the seams: stores, providers, scorers, the bus and
//!   the operator use-cases
//! - [`application`] - Decision engine, weight book, maturation sweep and
//!   the orchestrator
//! - [`adapter`] - SQLite store, Yahoo and simulated providers, strategy
//!   scorers, and the CLI
//! - [`infrastructure`] - Configuration, the in-process bus, wiring and
//!   the control loop lifecycle
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Expose in-memory stores, scripted providers and builders
//!   to integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
