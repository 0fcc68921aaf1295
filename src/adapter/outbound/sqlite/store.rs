//! SQLite store implementation.
//!
//! Provides persistent storage for every table of the control loop using
//! SQLite and Diesel ORM. Timestamps are stored as fixed-width RFC 3339
//! text (UTC, microseconds) so lexical order is chronological order, and
//! prices as decimal text so they round-trip exactly.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::{self, DbPool};
use crate::adapter::outbound::sqlite::database::model::{
    AssetRow, DecisionRow, NewDecisionRow, NewPerformanceRow, NewPredictionRow, NewSnapshotRow,
    PerformanceRow, PredictionRow, SnapshotChangeset, SnapshotRow, WeightRow,
};
use crate::adapter::outbound::sqlite::database::schema::{
    assets, decisions, market_data, performance_history, predictions, strategy_weights,
};
use crate::domain::action::Action;
use crate::domain::asset::Asset;
use crate::domain::decision::{Decision, WeightedPrediction};
use crate::domain::id::{AssetId, PredictionId, StrategyName};
use crate::domain::performance::PerformanceRecord;
use crate::domain::prediction::{Confidence, Prediction, PredictionPayload};
use crate::domain::snapshot::Snapshot;
use crate::domain::weight::StrategyWeight;
use crate::error::{Error, Result};
use crate::port::outbound::store::{
    AssetStore, DecisionStore, Insertion, PerformanceStore, PredictionStore, SnapshotStore,
    WeightStore,
};

type SqlitePooled = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed store.
///
/// Implements every persistence port over one connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (and migrate) the database at `database_url`.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(database_url: &str) -> Result<Self> {
        Ok(Self::new(connection::open(database_url)?))
    }

    fn connection(&self) -> Result<SqlitePooled> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

fn database_error(error: diesel::result::Error) -> Error {
    Error::Database(error.to_string())
}

fn insertion(affected: usize) -> Insertion {
    if affected > 0 {
        Insertion::Inserted
    } else {
        Insertion::Duplicate
    }
}

fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

fn decode_price(raw: Option<String>) -> Result<Option<Decimal>> {
    raw.map(|price| Decimal::from_str(&price).map_err(|e| Error::Parse(e.to_string())))
        .transpose()
}

fn decode_action(raw: &str) -> Result<Action> {
    Ok(raw.parse::<Action>()?)
}

fn limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn asset_from_row(row: AssetRow) -> Asset {
    Asset::new(AssetId::new(row.ticker), row.name, row.asset_type)
}

fn snapshot_from_row(row: SnapshotRow) -> Result<Snapshot> {
    Ok(Snapshot {
        asset_id: AssetId::new(row.asset_id),
        timestamp: decode_time(&row.timestamp)?,
        price: decode_price(row.price)?,
        volume: row.volume,
        sentiment_score: row.sentiment_score,
        sentiment_magnitude: row.sentiment_magnitude,
        currency: row.currency,
        source: row.source,
    })
}

fn prediction_from_row(row: PredictionRow) -> Result<Prediction> {
    let payload: PredictionPayload = serde_json::from_str(&row.prediction)?;
    Ok(Prediction {
        id: Some(PredictionId::new(row.id)),
        asset_id: AssetId::new(row.asset_id),
        strategy: StrategyName::new(row.strategy_name),
        timestamp: decode_time(&row.timestamp)?,
        payload,
        confidence: Confidence::clamped(row.confidence),
        rationale: row.reasoning,
    })
}

fn decision_from_row(row: DecisionRow) -> Result<Decision> {
    let weighted_predictions: Vec<WeightedPrediction> =
        serde_json::from_str(&row.weighted_predictions)?;
    Ok(Decision {
        asset_id: AssetId::new(row.asset_id),
        timestamp: decode_time(&row.timestamp)?,
        action: decode_action(&row.action)?,
        confidence: Confidence::clamped(row.confidence_score),
        rationale: row.reasoning,
        weighted_predictions,
    })
}

fn weight_from_row(row: WeightRow) -> Result<StrategyWeight> {
    Ok(StrategyWeight {
        strategy: StrategyName::new(row.strategy_name),
        weight: row.weight,
        performance_score: row.performance_score,
        updated_at: decode_time(&row.last_updated)?,
    })
}

fn performance_from_row(row: PerformanceRow) -> Result<PerformanceRecord> {
    Ok(PerformanceRecord {
        prediction_id: PredictionId::new(row.prediction_id),
        asset_id: AssetId::new(row.asset_id),
        strategy: StrategyName::new(row.strategy_name),
        timestamp: decode_time(&row.timestamp)?,
        predicted_action: decode_action(&row.predicted_action)?,
        actual_outcome: row.actual_outcome,
        performance_score: row.performance_score,
    })
}

impl AssetStore for SqliteStore {
    async fn register_asset(&self, asset: &Asset) -> Result<Insertion> {
        let row = AssetRow {
            ticker: asset.id().as_str().to_string(),
            name: asset.name().to_string(),
            asset_type: asset.category().to_string(),
            created_at: encode_time(Utc::now()),
        };
        let mut conn = self.connection()?;

        let affected = diesel::insert_or_ignore_into(assets::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(insertion(affected))
    }

    async fn rename_asset(&self, id: &AssetId, name: &str) -> Result<bool> {
        let mut conn = self.connection()?;

        let updated = diesel::update(assets::table.find(id.as_str()))
            .set(assets::name.eq(name))
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(updated > 0)
    }

    async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        let mut conn = self.connection()?;

        let row: Option<AssetRow> = assets::table
            .find(id.as_str())
            .select(AssetRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(database_error)?;

        Ok(row.map(asset_from_row))
    }

    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let mut conn = self.connection()?;

        let rows: Vec<AssetRow> = assets::table
            .order(assets::ticker.asc())
            .select(AssetRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        Ok(rows.into_iter().map(asset_from_row).collect())
    }
}

impl SnapshotStore for SqliteStore {
    async fn upsert_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let price = snapshot.price.map(|p| p.to_string());
        let row = NewSnapshotRow {
            asset_id: snapshot.asset_id.as_str().to_string(),
            timestamp: encode_time(snapshot.timestamp),
            price: price.clone(),
            volume: snapshot.volume,
            sentiment_score: snapshot.sentiment_score,
            sentiment_magnitude: snapshot.sentiment_magnitude,
            currency: snapshot.currency.clone(),
            source: snapshot.source.clone(),
            created_at: encode_time(Utc::now()),
        };
        let changes = SnapshotChangeset {
            price,
            volume: snapshot.volume,
            sentiment_score: snapshot.sentiment_score,
            sentiment_magnitude: snapshot.sentiment_magnitude,
            currency: snapshot.currency.clone(),
            source: snapshot.source.clone(),
        };
        let mut conn = self.connection()?;

        let insert = diesel::insert_into(market_data::table)
            .values(&row)
            .on_conflict((market_data::asset_id, market_data::timestamp));
        if changes.is_empty() {
            insert.do_nothing().execute(&mut conn)
        } else {
            insert.do_update().set(&changes).execute(&mut conn)
        }
        .map_err(database_error)?;

        Ok(())
    }

    async fn get_snapshot(
        &self,
        asset: &AssetId,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Snapshot>> {
        let mut conn = self.connection()?;

        let row: Option<SnapshotRow> = market_data::table
            .filter(market_data::asset_id.eq(asset.as_str()))
            .filter(market_data::timestamp.eq(encode_time(timestamp)))
            .select(SnapshotRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(database_error)?;

        row.map(snapshot_from_row).transpose()
    }

    async fn recent_snapshots(&self, asset: &AssetId, n: usize) -> Result<Vec<Snapshot>> {
        let mut conn = self.connection()?;

        let rows: Vec<SnapshotRow> = market_data::table
            .filter(market_data::asset_id.eq(asset.as_str()))
            .order(market_data::timestamp.desc())
            .limit(limit(n))
            .select(SnapshotRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(snapshot_from_row).collect()
    }

    async fn first_price_after(
        &self,
        asset: &AssetId,
        after: DateTime<Utc>,
    ) -> Result<Option<Decimal>> {
        let mut conn = self.connection()?;

        let price: Option<Option<String>> = market_data::table
            .filter(market_data::asset_id.eq(asset.as_str()))
            .filter(market_data::timestamp.gt(encode_time(after)))
            .filter(market_data::price.is_not_null())
            .order(market_data::timestamp.asc())
            .select(market_data::price)
            .first(&mut conn)
            .optional()
            .map_err(database_error)?;

        decode_price(price.flatten())
    }

    async fn latest_price(&self, asset: &AssetId) -> Result<Option<Decimal>> {
        let mut conn = self.connection()?;

        let price: Option<Option<String>> = market_data::table
            .filter(market_data::asset_id.eq(asset.as_str()))
            .filter(market_data::price.is_not_null())
            .order(market_data::timestamp.desc())
            .select(market_data::price)
            .first(&mut conn)
            .optional()
            .map_err(database_error)?;

        decode_price(price.flatten())
    }
}

impl PredictionStore for SqliteStore {
    async fn insert_prediction(&self, prediction: &Prediction) -> Result<Insertion> {
        let row = NewPredictionRow {
            asset_id: prediction.asset_id.as_str().to_string(),
            strategy_name: prediction.strategy.as_str().to_string(),
            timestamp: encode_time(prediction.timestamp),
            prediction: serde_json::to_string(&prediction.payload)?,
            confidence: prediction.confidence.value(),
            reasoning: prediction.rationale.clone(),
            created_at: encode_time(Utc::now()),
        };
        let mut conn = self.connection()?;

        let affected = diesel::insert_or_ignore_into(predictions::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(insertion(affected))
    }

    async fn unscored_predictions(
        &self,
        asset: &AssetId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Prediction>> {
        let mut conn = self.connection()?;

        let rows: Vec<PredictionRow> = predictions::table
            .left_join(performance_history::table)
            .filter(predictions::asset_id.eq(asset.as_str()))
            .filter(predictions::timestamp.lt(encode_time(cutoff)))
            .filter(performance_history::id.is_null())
            .order((predictions::timestamp.asc(), predictions::id.asc()))
            .select(PredictionRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(prediction_from_row).collect()
    }

    async fn recent_predictions(&self, asset: &AssetId, n: usize) -> Result<Vec<Prediction>> {
        let mut conn = self.connection()?;

        let rows: Vec<PredictionRow> = predictions::table
            .filter(predictions::asset_id.eq(asset.as_str()))
            .order((predictions::timestamp.desc(), predictions::strategy_name.asc()))
            .limit(limit(n))
            .select(PredictionRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(prediction_from_row).collect()
    }
}

impl DecisionStore for SqliteStore {
    async fn insert_decision(&self, decision: &Decision) -> Result<()> {
        let row = NewDecisionRow {
            asset_id: decision.asset_id.as_str().to_string(),
            timestamp: encode_time(decision.timestamp),
            action: decision.action.as_str().to_string(),
            confidence_score: decision.confidence.value(),
            reasoning: decision.rationale.clone(),
            weighted_predictions: serde_json::to_string(&decision.weighted_predictions)?,
            created_at: encode_time(Utc::now()),
        };
        let mut conn = self.connection()?;

        diesel::insert_into(decisions::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(())
    }

    async fn recent_decisions(&self, asset: &AssetId, n: usize) -> Result<Vec<Decision>> {
        let mut conn = self.connection()?;

        let rows: Vec<DecisionRow> = decisions::table
            .filter(decisions::asset_id.eq(asset.as_str()))
            .order((decisions::timestamp.desc(), decisions::id.desc()))
            .limit(limit(n))
            .select(DecisionRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(decision_from_row).collect()
    }
}

impl WeightStore for SqliteStore {
    async fn seed_weight(
        &self,
        strategy: &StrategyName,
        weight: f64,
        at: DateTime<Utc>,
    ) -> Result<Insertion> {
        let row = WeightRow {
            strategy_name: strategy.as_str().to_string(),
            weight,
            performance_score: None,
            last_updated: encode_time(at),
        };
        let mut conn = self.connection()?;

        let affected = diesel::insert_or_ignore_into(strategy_weights::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(insertion(affected))
    }

    async fn load_weights(&self) -> Result<Vec<StrategyWeight>> {
        let mut conn = self.connection()?;

        let rows: Vec<WeightRow> = strategy_weights::table
            .order(strategy_weights::strategy_name.asc())
            .select(WeightRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(weight_from_row).collect()
    }

    async fn save_weight(&self, weight: &StrategyWeight) -> Result<()> {
        let row = WeightRow {
            strategy_name: weight.strategy.as_str().to_string(),
            weight: weight.weight,
            performance_score: weight.performance_score,
            last_updated: encode_time(weight.updated_at),
        };
        let mut conn = self.connection()?;

        diesel::replace_into(strategy_weights::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(())
    }
}

impl PerformanceStore for SqliteStore {
    async fn insert_performance(&self, record: &PerformanceRecord) -> Result<Insertion> {
        let row = NewPerformanceRow {
            asset_id: record.asset_id.as_str().to_string(),
            strategy_name: record.strategy.as_str().to_string(),
            prediction_id: record.prediction_id.value(),
            timestamp: encode_time(record.timestamp),
            predicted_action: record.predicted_action.as_str().to_string(),
            actual_outcome: record.actual_outcome,
            performance_score: record.performance_score,
            created_at: encode_time(Utc::now()),
        };
        let mut conn = self.connection()?;

        let affected = diesel::insert_or_ignore_into(performance_history::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(database_error)?;

        Ok(insertion(affected))
    }

    async fn has_performance(&self, prediction: PredictionId) -> Result<bool> {
        let mut conn = self.connection()?;

        let count: i64 = performance_history::table
            .filter(performance_history::prediction_id.eq(prediction.value()))
            .count()
            .get_result(&mut conn)
            .map_err(database_error)?;

        Ok(count > 0)
    }

    async fn recent_performance(
        &self,
        asset: &AssetId,
        n: usize,
    ) -> Result<Vec<PerformanceRecord>> {
        let mut conn = self.connection()?;

        let rows: Vec<PerformanceRow> = performance_history::table
            .filter(performance_history::asset_id.eq(asset.as_str()))
            .order((
                performance_history::timestamp.desc(),
                performance_history::id.desc(),
            ))
            .limit(limit(n))
            .select(PerformanceRow::as_select())
            .load(&mut conn)
            .map_err(database_error)?;

        rows.into_iter().map(performance_from_row).collect()
    }
}
