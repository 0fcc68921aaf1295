//! Outbound adapters (driven side).

pub mod provider;
pub mod sqlite;
pub mod strategy;
