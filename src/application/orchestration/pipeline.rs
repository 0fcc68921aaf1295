//! Per-asset pipeline states.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::id::CycleId;

/// Where one asset's pipeline stands within the current tick.
///
/// A tick moves each asset through price, sentiment and analysis in
/// order. A provider failure removes the entry; the next tick starts over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// Price request sent.
    AwaitingPrice,
    /// Price stored under `timestamp`, sentiment request sent.
    AwaitingSentiment { timestamp: DateTime<Utc> },
    /// Analysis requests fanned out under `cycle`.
    Analyzing {
        cycle: CycleId,
        timestamp: DateTime<Utc>,
    },
    /// Decision stored for `timestamp`.
    Decided { timestamp: DateTime<Utc> },
}

impl PipelineState {
    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AwaitingPrice => "awaiting_price",
            Self::AwaitingSentiment { .. } => "awaiting_sentiment",
            Self::Analyzing { .. } => "analyzing",
            Self::Decided { .. } => "decided",
        }
    }

    /// True while the pipeline waits on a data provider.
    #[must_use]
    pub const fn awaiting_provider(&self) -> bool {
        matches!(self, Self::AwaitingPrice | Self::AwaitingSentiment { .. })
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
