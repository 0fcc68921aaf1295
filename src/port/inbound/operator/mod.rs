//! Operator-facing inbound ports consumed by CLI adapters.

pub mod asset;
pub mod configuration;
pub mod port;
pub mod report;
pub mod runtime;
