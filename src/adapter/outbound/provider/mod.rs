//! Market data providers and the bus endpoints that serve them.
//!
//! - [`yahoo`]: live prices and news over HTTP.
//! - [`lexicon`]: keyword sentiment scoring for news texts.
//! - [`simulated`]: seeded random walks for offline runs.
//! - [`endpoint`]: request/reply loops with per-call timeouts.

pub mod endpoint;
pub mod lexicon;
pub mod settings;
pub mod simulated;
pub mod yahoo;
