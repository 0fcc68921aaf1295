//! Strategy scoring port.

use crate::domain::id::StrategyName;
use crate::domain::message::AnalysisRequest;
use crate::domain::prediction::Assessment;
use crate::error::Result;

/// An independent scoring function.
///
/// Scorers are pure: given the same request they return the same
/// assessment. The strategy endpoint answers on their behalf when the
/// history is shorter than [`min_history`](Self::min_history) or scoring
/// fails.
pub trait StrategyScorer: Send + Sync {
    /// Name the strategy's weight and predictions are stored under.
    fn name(&self) -> StrategyName;

    /// Minimum number of historical snapshots required.
    fn min_history(&self) -> usize;

    /// Score one analysis request.
    ///
    /// # Errors
    ///
    /// Returns an error if the input data cannot be scored.
    fn score(&self, request: &AnalysisRequest) -> Result<Assessment>;
}
