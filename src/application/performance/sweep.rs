//! Maturation sweep.
//!
//! Scores predictions once they are older than the maturation window and
//! feeds each score into the owning strategy's weight. The performance
//! record is written before the weight is touched, and only a freshly
//! inserted record moves the weight, so a prediction can influence its
//! strategy at most once no matter how often the sweep runs.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::application::weight::book::WeightBook;
use crate::domain::id::AssetId;
use crate::domain::performance::{performance_score, price_change, PerformanceRecord};
use crate::domain::prediction::Prediction;
use crate::error::Result;
use crate::port::outbound::store::{Insertion, PerformanceStore, PredictionStore, SnapshotStore};

/// Default number of days before a prediction is scored.
pub const DEFAULT_MATURATION_DAYS: u32 = 7;

/// Configuration for the maturation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackConfig {
    /// Age a prediction must exceed before it is scored.
    pub maturation: Duration,
}

impl FeedbackConfig {
    #[must_use]
    pub fn from_days(days: u32) -> Self {
        Self {
            maturation: Duration::days(i64::from(days)),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self::from_days(DEFAULT_MATURATION_DAYS)
    }
}

/// Counts from one sweep over one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Predictions newly scored and fed back into weights.
    pub scored: usize,
    /// Predictions that already carried a record.
    pub skipped: usize,
    /// Predictions whose weight update failed after the record was written.
    pub failed: usize,
}

/// Scores matured predictions and updates strategy weights.
pub struct MaturationSweep<S> {
    store: Arc<S>,
    weights: WeightBook,
    config: FeedbackConfig,
}

impl<S> MaturationSweep<S>
where
    S: SnapshotStore + PredictionStore + PerformanceStore,
{
    #[must_use]
    pub fn new(store: Arc<S>, weights: WeightBook, config: FeedbackConfig) -> Self {
        Self {
            store,
            weights,
            config,
        }
    }

    /// Score every unscored prediction for `asset` older than the window.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried. Failures on a single
    /// prediction's weight update are logged and counted instead.
    pub async fn sweep(&self, asset: &AssetId, now: DateTime<Utc>) -> Result<SweepReport> {
        let cutoff = now - self.config.maturation;
        let matured = self.store.unscored_predictions(asset, cutoff).await?;
        if matured.is_empty() {
            return Ok(SweepReport::default());
        }

        let current = self.store.latest_price(asset).await?;
        let mut report = SweepReport::default();

        for prediction in &matured {
            match self.score(prediction, current, now).await? {
                Scored::Applied => report.scored += 1,
                Scored::Skipped => report.skipped += 1,
                Scored::WeightFailed => report.failed += 1,
            }
        }

        info!(
            asset = %asset,
            scored = report.scored,
            skipped = report.skipped,
            failed = report.failed,
            "Maturation sweep finished"
        );
        Ok(report)
    }

    async fn score(
        &self,
        prediction: &Prediction,
        current: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<Scored> {
        let Some(prediction_id) = prediction.id else {
            warn!(strategy = %prediction.strategy, "Stored prediction without id, skipping");
            return Ok(Scored::Skipped);
        };
        if self.store.has_performance(prediction_id).await? {
            debug!(prediction = %prediction_id, "Prediction already scored");
            return Ok(Scored::Skipped);
        }

        let before = self
            .store
            .first_price_after(&prediction.asset_id, prediction.timestamp)
            .await?;
        let change = price_change(before, current);
        let action = prediction.action();
        let score = performance_score(action, change);

        let record = PerformanceRecord {
            prediction_id,
            asset_id: prediction.asset_id.clone(),
            strategy: prediction.strategy.clone(),
            timestamp: prediction.timestamp,
            predicted_action: action,
            actual_outcome: change,
            performance_score: score,
        };

        match self.store.insert_performance(&record).await? {
            Insertion::Inserted => {}
            Insertion::Duplicate => {
                error!(
                    prediction = %prediction_id,
                    strategy = %prediction.strategy,
                    "Performance record already exists for prediction; not updating weight"
                );
                return Ok(Scored::Skipped);
            }
        }

        match self
            .weights
            .update_weight(&prediction.strategy, score, now)
            .await
        {
            Ok(_) => Ok(Scored::Applied),
            Err(e) => {
                error!(
                    prediction = %prediction_id,
                    strategy = %prediction.strategy,
                    error = %e,
                    "Weight update failed after scoring"
                );
                Ok(Scored::WeightFailed)
            }
        }
    }
}

enum Scored {
    Applied,
    Skipped,
    WeightFailed,
}
