//! The orchestrator control loop and its bookkeeping.

pub mod config;
pub mod correlation;
pub mod orchestrator;
pub mod pipeline;
