//! Persistence ports for assets, observations, predictions, decisions,
//! weights and performance records.
//!
//! Snapshot and weight writes are upserts keyed by their natural key.
//! Predictions and performance records are append-only; a second insert for
//! the same natural key is reported as [`Insertion::Duplicate`] instead of
//! failing, so callers can decide how loudly to complain.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::asset::Asset;
use crate::domain::decision::Decision;
use crate::domain::id::{AssetId, PredictionId, StrategyName};
use crate::domain::performance::PerformanceRecord;
use crate::domain::prediction::Prediction;
use crate::domain::snapshot::Snapshot;
use crate::domain::weight::StrategyWeight;
use crate::error::Result;

/// Outcome of an insert-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Inserted,
    Duplicate,
}

impl Insertion {
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Storage operations for tracked assets.
pub trait AssetStore: Send + Sync {
    /// Register an asset unless its ticker already exists.
    fn register_asset(&self, asset: &Asset) -> impl Future<Output = Result<Insertion>> + Send;

    /// Change an asset's display name. Returns `false` for unknown tickers.
    fn rename_asset(&self, id: &AssetId, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Get an asset by ticker.
    fn get_asset(&self, id: &AssetId) -> impl Future<Output = Result<Option<Asset>>> + Send;

    /// List all assets ordered by ticker.
    fn list_assets(&self) -> impl Future<Output = Result<Vec<Asset>>> + Send;
}

/// Storage operations for market snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Insert or merge a snapshot by `(asset, timestamp)`. Only fields
    /// present on `snapshot` overwrite the stored row.
    fn upsert_snapshot(&self, snapshot: &Snapshot) -> impl Future<Output = Result<()>> + Send;

    /// Get the snapshot stored under one key.
    fn get_snapshot(
        &self,
        asset: &AssetId,
        timestamp: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Snapshot>>> + Send;

    /// Most recent snapshots for an asset, newest first.
    fn recent_snapshots(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Snapshot>>> + Send;

    /// Earliest non-null price strictly after `after`.
    fn first_price_after(
        &self,
        asset: &AssetId,
        after: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Decimal>>> + Send;

    /// Latest non-null price.
    fn latest_price(&self, asset: &AssetId) -> impl Future<Output = Result<Option<Decimal>>> + Send;
}

/// Storage operations for strategy predictions.
pub trait PredictionStore: Send + Sync {
    /// Append a prediction unless `(asset, strategy, timestamp)` exists.
    fn insert_prediction(
        &self,
        prediction: &Prediction,
    ) -> impl Future<Output = Result<Insertion>> + Send;

    /// Predictions older than `cutoff` that have no performance record,
    /// oldest first.
    fn unscored_predictions(
        &self,
        asset: &AssetId,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Prediction>>> + Send;

    /// Most recent predictions for an asset, newest first.
    fn recent_predictions(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Prediction>>> + Send;
}

/// Storage operations for ensemble decisions.
pub trait DecisionStore: Send + Sync {
    /// Append a decision.
    fn insert_decision(&self, decision: &Decision) -> impl Future<Output = Result<()>> + Send;

    /// Most recent decisions for an asset, newest first.
    fn recent_decisions(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Decision>>> + Send;
}

/// Storage operations for strategy weights.
pub trait WeightStore: Send + Sync {
    /// Create a weight row unless one exists for the strategy.
    fn seed_weight(
        &self,
        strategy: &StrategyName,
        weight: f64,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Insertion>> + Send;

    /// Load all weights ordered by strategy name.
    fn load_weights(&self) -> impl Future<Output = Result<Vec<StrategyWeight>>> + Send;

    /// Save a weight, replacing the existing row.
    fn save_weight(&self, weight: &StrategyWeight) -> impl Future<Output = Result<()>> + Send;
}

/// Storage operations for performance records.
pub trait PerformanceStore: Send + Sync {
    /// Append a record unless one exists for the prediction.
    fn insert_performance(
        &self,
        record: &PerformanceRecord,
    ) -> impl Future<Output = Result<Insertion>> + Send;

    /// Whether a prediction already has a performance record.
    fn has_performance(&self, prediction: PredictionId)
        -> impl Future<Output = Result<bool>> + Send;

    /// Most recent records for an asset, newest first.
    fn recent_performance(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PerformanceRecord>>> + Send;
}

/// Every persistence capability the control loop needs.
pub trait Store:
    AssetStore + SnapshotStore + PredictionStore + DecisionStore + WeightStore + PerformanceStore
{
}

impl<T> Store for T where
    T: AssetStore
        + SnapshotStore
        + PredictionStore
        + DecisionStore
        + WeightStore
        + PerformanceStore
{
}
