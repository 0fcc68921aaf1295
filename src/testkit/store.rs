//! In-memory implementation of every store port.
//!
//! Mirrors the SQLite semantics: snapshot upserts merge by key, predictions
//! and performance records are insert-if-absent, weights are replaced.
//! Rows must reference a registered asset (and performance records a stored
//! prediction), as the foreign keys require.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::asset::Asset;
use crate::domain::decision::Decision;
use crate::domain::id::{AssetId, PredictionId, StrategyName};
use crate::domain::performance::PerformanceRecord;
use crate::domain::prediction::Prediction;
use crate::domain::snapshot::Snapshot;
use crate::domain::weight::StrategyWeight;
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AssetStore, DecisionStore, Insertion, PerformanceStore, PredictionStore, SnapshotStore,
    WeightStore,
};

#[derive(Default)]
struct Tables {
    assets: BTreeMap<AssetId, Asset>,
    snapshots: BTreeMap<(AssetId, DateTime<Utc>), Snapshot>,
    predictions: Vec<Prediction>,
    decisions: Vec<Decision>,
    weights: BTreeMap<StrategyName, StrategyWeight>,
    performance: Vec<PerformanceRecord>,
    next_prediction_id: i64,
}

/// Store kept entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given tickers already registered as stocks.
    #[must_use]
    pub fn with_assets(tickers: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut tables = store.tables.lock();
            for ticker in tickers {
                let id = AssetId::new(*ticker);
                tables
                    .assets
                    .insert(id.clone(), Asset::new(id, *ticker, "stock"));
            }
        }
        store
    }

    /// Make every write fail with [`Error::Database`] until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::Database("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

fn foreign_key_violation() -> Error {
    Error::Database("FOREIGN KEY constraint failed".into())
}

impl Tables {
    fn require_asset(&self, asset: &AssetId) -> Result<()> {
        if self.assets.contains_key(asset) {
            Ok(())
        } else {
            Err(foreign_key_violation())
        }
    }
}

fn newest_first<T>(rows: impl DoubleEndedIterator<Item = T>, limit: usize) -> Vec<T> {
    rows.rev().take(limit).collect()
}

impl AssetStore for MemoryStore {
    async fn register_asset(&self, asset: &Asset) -> Result<Insertion> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        if tables.assets.contains_key(asset.id()) {
            return Ok(Insertion::Duplicate);
        }
        tables.assets.insert(asset.id().clone(), asset.clone());
        Ok(Insertion::Inserted)
    }

    async fn rename_asset(&self, id: &AssetId, name: &str) -> Result<bool> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        match tables.assets.get_mut(id) {
            Some(asset) => {
                *asset = asset.renamed(name);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        Ok(self.tables.lock().assets.get(id).cloned())
    }

    async fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.tables.lock().assets.values().cloned().collect())
    }
}

impl SnapshotStore for MemoryStore {
    async fn upsert_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.check_writable()?;
        let key = (snapshot.asset_id.clone(), snapshot.timestamp);
        let mut tables = self.tables.lock();
        tables.require_asset(&snapshot.asset_id)?;
        match tables.snapshots.get_mut(&key) {
            Some(existing) => {
                existing.merge(snapshot);
            }
            None => {
                tables.snapshots.insert(key, snapshot.clone());
            }
        }
        Ok(())
    }

    async fn get_snapshot(
        &self,
        asset: &AssetId,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Snapshot>> {
        let key = (asset.clone(), timestamp);
        Ok(self.tables.lock().snapshots.get(&key).cloned())
    }

    async fn recent_snapshots(&self, asset: &AssetId, limit: usize) -> Result<Vec<Snapshot>> {
        let tables = self.tables.lock();
        let rows = tables
            .snapshots
            .values()
            .filter(|s| &s.asset_id == asset)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), limit))
    }

    async fn first_price_after(
        &self,
        asset: &AssetId,
        after: DateTime<Utc>,
    ) -> Result<Option<Decimal>> {
        let tables = self.tables.lock();
        Ok(tables
            .snapshots
            .values()
            .filter(|s| &s.asset_id == asset && s.timestamp > after)
            .find_map(|s| s.price))
    }

    async fn latest_price(&self, asset: &AssetId) -> Result<Option<Decimal>> {
        let tables = self.tables.lock();
        Ok(tables
            .snapshots
            .values()
            .rev()
            .filter(|s| &s.asset_id == asset)
            .find_map(|s| s.price))
    }
}

impl PredictionStore for MemoryStore {
    async fn insert_prediction(&self, prediction: &Prediction) -> Result<Insertion> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        tables.require_asset(&prediction.asset_id)?;
        let exists = tables.predictions.iter().any(|p| {
            p.asset_id == prediction.asset_id
                && p.strategy == prediction.strategy
                && p.timestamp == prediction.timestamp
        });
        if exists {
            return Ok(Insertion::Duplicate);
        }
        tables.next_prediction_id += 1;
        let mut stored = prediction.clone();
        stored.id = Some(PredictionId::new(tables.next_prediction_id));
        tables.predictions.push(stored);
        Ok(Insertion::Inserted)
    }

    async fn unscored_predictions(
        &self,
        asset: &AssetId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Prediction>> {
        let tables = self.tables.lock();
        let mut rows: Vec<Prediction> = tables
            .predictions
            .iter()
            .filter(|p| &p.asset_id == asset && p.timestamp < cutoff)
            .filter(|p| {
                !tables
                    .performance
                    .iter()
                    .any(|r| Some(r.prediction_id) == p.id)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|p| (p.timestamp, p.id.map(PredictionId::value)));
        Ok(rows)
    }

    async fn recent_predictions(&self, asset: &AssetId, limit: usize) -> Result<Vec<Prediction>> {
        let tables = self.tables.lock();
        let mut rows: Vec<Prediction> = tables
            .predictions
            .iter()
            .filter(|p| &p.asset_id == asset)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.strategy.cmp(&b.strategy))
        });
        rows.truncate(limit);
        Ok(rows)
    }
}

impl DecisionStore for MemoryStore {
    async fn insert_decision(&self, decision: &Decision) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        tables.require_asset(&decision.asset_id)?;
        tables.decisions.push(decision.clone());
        Ok(())
    }

    async fn recent_decisions(&self, asset: &AssetId, limit: usize) -> Result<Vec<Decision>> {
        let tables = self.tables.lock();
        let mut rows: Vec<Decision> = newest_first(
            tables
                .decisions
                .iter()
                .filter(|d| &d.asset_id == asset)
                .cloned()
                .collect::<Vec<_>>()
                .into_iter(),
            usize::MAX,
        );
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }
}

impl WeightStore for MemoryStore {
    async fn seed_weight(
        &self,
        strategy: &StrategyName,
        weight: f64,
        at: DateTime<Utc>,
    ) -> Result<Insertion> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        if tables.weights.contains_key(strategy) {
            return Ok(Insertion::Duplicate);
        }
        tables.weights.insert(
            strategy.clone(),
            StrategyWeight::initial(strategy.clone(), weight, at),
        );
        Ok(Insertion::Inserted)
    }

    async fn load_weights(&self) -> Result<Vec<StrategyWeight>> {
        Ok(self.tables.lock().weights.values().cloned().collect())
    }

    async fn save_weight(&self, weight: &StrategyWeight) -> Result<()> {
        self.check_writable()?;
        self.tables
            .lock()
            .weights
            .insert(weight.strategy.clone(), weight.clone());
        Ok(())
    }
}

impl PerformanceStore for MemoryStore {
    async fn insert_performance(&self, record: &PerformanceRecord) -> Result<Insertion> {
        self.check_writable()?;
        let mut tables = self.tables.lock();
        tables.require_asset(&record.asset_id)?;
        if !tables
            .predictions
            .iter()
            .any(|p| p.id == Some(record.prediction_id))
        {
            return Err(foreign_key_violation());
        }
        if tables
            .performance
            .iter()
            .any(|r| r.prediction_id == record.prediction_id)
        {
            return Ok(Insertion::Duplicate);
        }
        tables.performance.push(record.clone());
        Ok(Insertion::Inserted)
    }

    async fn has_performance(&self, prediction: PredictionId) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .performance
            .iter()
            .any(|r| r.prediction_id == prediction))
    }

    async fn recent_performance(
        &self,
        asset: &AssetId,
        limit: usize,
    ) -> Result<Vec<PerformanceRecord>> {
        let tables = self.tables.lock();
        let mut rows: Vec<PerformanceRecord> = newest_first(
            tables
                .performance
                .iter()
                .filter(|r| &r.asset_id == asset)
                .cloned()
                .collect::<Vec<_>>()
                .into_iter(),
            usize::MAX,
        );
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows.truncate(limit);
        Ok(rows)
    }
}
