//! Application services (use cases).
//!
//! These services drive the domain rules through the outbound ports:
//! registering assets, deciding from strategy votes, keeping strategy
//! weights and running the periodic control loop.

pub mod asset;
pub mod decision;
pub mod orchestration;
pub mod performance;
pub mod weight;
