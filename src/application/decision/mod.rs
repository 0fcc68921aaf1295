//! Ensemble decision making.

pub mod engine;
