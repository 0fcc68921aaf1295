//! Operator implementations for inbound adapters.

pub mod asset;
pub mod configuration;
pub mod entry;
pub mod report;
pub mod runtime;

mod shared;
