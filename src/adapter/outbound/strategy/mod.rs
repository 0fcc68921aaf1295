//! Strategy scorers and the endpoint that serves them on the bus.
//!
//! Scorers are pure functions of an [`AnalysisRequest`](crate::domain::message::AnalysisRequest);
//! the endpoint handles short histories and scorer errors uniformly.

pub mod endpoint;
pub mod mean_reversion;
pub mod momentum;
pub mod registry;
pub mod sentiment_momentum;
mod series;
