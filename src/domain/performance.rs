//! Realized outcomes of matured predictions.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::id::{AssetId, PredictionId, StrategyName};

/// Fractional price move from `before` to `current`.
///
/// A missing or non-positive `before` price yields 0 rather than a
/// division error.
#[must_use]
pub fn price_change(before: Option<Decimal>, current: Option<Decimal>) -> f64 {
    let (Some(before), Some(current)) = (before, current) else {
        return 0.0;
    };
    if before <= Decimal::ZERO {
        return 0.0;
    }
    ((current - before) / before).to_f64().unwrap_or(0.0)
}

/// Score a predicted action against the realized move.
///
/// Buy is rewarded by upward moves, sell by downward moves and hold by
/// stability (bounded above by 1).
#[must_use]
pub fn performance_score(action: Action, change: f64) -> f64 {
    match action {
        Action::Buy => change,
        Action::Sell => -change,
        Action::Hold => 1.0 - change.abs(),
    }
}

/// Link between one prediction and its realized outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub prediction_id: PredictionId,
    pub asset_id: AssetId,
    pub strategy: StrategyName,
    pub timestamp: DateTime<Utc>,
    pub predicted_action: Action,
    pub actual_outcome: f64,
    pub performance_score: f64,
}
