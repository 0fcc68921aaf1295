//! Pure core types: assets, observations, predictions, decisions, weights
//! and the messages that move them between endpoints.

pub mod action;
pub mod asset;
pub mod decision;
pub mod error;
pub mod id;
pub mod message;
pub mod performance;
pub mod prediction;
pub mod snapshot;
pub mod weight;
