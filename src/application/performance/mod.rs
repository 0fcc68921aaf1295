//! Performance feedback for matured predictions.

pub mod sweep;
