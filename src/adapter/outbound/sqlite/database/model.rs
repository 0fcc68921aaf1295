//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{
    assets, decisions, market_data, performance_history, predictions, strategy_weights,
};

/// Database row for an asset.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetRow {
    pub ticker: String,
    pub name: String,
    pub asset_type: String,
    pub created_at: String,
}

/// Database row for a market snapshot (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = market_data)]
pub struct NewSnapshotRow {
    pub asset_id: String,
    pub timestamp: String,
    pub price: Option<String>,
    pub volume: Option<i64>,
    pub sentiment_score: Option<f64>,
    pub sentiment_magnitude: Option<f64>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub created_at: String,
}

/// Partial update merged into an existing snapshot row.
///
/// `None` fields are left out of the generated `SET` clause.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = market_data)]
pub struct SnapshotChangeset {
    pub price: Option<String>,
    pub volume: Option<i64>,
    pub sentiment_score: Option<f64>,
    pub sentiment_magnitude: Option<f64>,
    pub currency: Option<String>,
    pub source: Option<String>,
}

impl SnapshotChangeset {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.volume.is_none()
            && self.sentiment_score.is_none()
            && self.sentiment_magnitude.is_none()
            && self.currency.is_none()
            && self.source.is_none()
    }
}

/// Database row for a market snapshot (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = market_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotRow {
    pub id: i64,
    pub asset_id: String,
    pub timestamp: String,
    pub price: Option<String>,
    pub volume: Option<i64>,
    pub sentiment_score: Option<f64>,
    pub sentiment_magnitude: Option<f64>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub created_at: String,
}

/// Database row for a prediction (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = predictions)]
pub struct NewPredictionRow {
    pub asset_id: String,
    pub strategy_name: String,
    pub timestamp: String,
    pub prediction: String,
    pub confidence: f64,
    pub reasoning: String,
    pub created_at: String,
}

/// Database row for a prediction (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = predictions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PredictionRow {
    pub id: i64,
    pub asset_id: String,
    pub strategy_name: String,
    pub timestamp: String,
    pub prediction: String,
    pub confidence: f64,
    pub reasoning: String,
    pub created_at: String,
}

/// Database row for a decision (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = decisions)]
pub struct NewDecisionRow {
    pub asset_id: String,
    pub timestamp: String,
    pub action: String,
    pub confidence_score: f64,
    pub reasoning: String,
    pub weighted_predictions: String,
    pub created_at: String,
}

/// Database row for a decision (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = decisions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DecisionRow {
    pub id: i64,
    pub asset_id: String,
    pub timestamp: String,
    pub action: String,
    pub confidence_score: f64,
    pub reasoning: String,
    pub weighted_predictions: String,
    pub created_at: String,
}

/// Database row for a strategy weight.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = strategy_weights)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WeightRow {
    pub strategy_name: String,
    pub weight: f64,
    pub performance_score: Option<f64>,
    pub last_updated: String,
}

/// Database row for a performance record (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = performance_history)]
pub struct NewPerformanceRow {
    pub asset_id: String,
    pub strategy_name: String,
    pub prediction_id: i64,
    pub timestamp: String,
    pub predicted_action: String,
    pub actual_outcome: f64,
    pub performance_score: f64,
    pub created_at: String,
}

/// Database row for a performance record (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = performance_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceRow {
    pub id: i64,
    pub asset_id: String,
    pub strategy_name: String,
    pub prediction_id: i64,
    pub timestamp: String,
    pub predicted_action: String,
    pub actual_outcome: f64,
    pub performance_score: f64,
    pub created_at: String,
}
