//! History projections for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Strategy weight row.
#[derive(Debug, Clone)]
pub struct WeightView {
    pub strategy: String,
    pub weight: f64,
    pub performance_score: Option<f64>,
    pub updated_at: String,
}

/// Decision row.
#[derive(Debug, Clone)]
pub struct DecisionView {
    pub timestamp: String,
    pub action: String,
    pub confidence: f64,
    pub rationale: String,
    pub contributors: usize,
}

/// Prediction row.
#[derive(Debug, Clone)]
pub struct PredictionView {
    pub timestamp: String,
    pub strategy: String,
    pub action: String,
    pub target_price: Option<f64>,
    pub confidence: f64,
    pub rationale: String,
}

/// Performance record row.
#[derive(Debug, Clone)]
pub struct PerformanceView {
    pub timestamp: String,
    pub strategy: String,
    pub predicted_action: String,
    pub price_change: f64,
    pub score: f64,
}

/// History use-cases for operator-facing adapters.
#[async_trait]
pub trait ReportOperator: Send + Sync {
    /// Current trust weight of every known strategy.
    async fn strategy_weights(&self, database_url: &str) -> Result<Vec<WeightView>>;

    /// Most recent decisions for a ticker.
    async fn decision_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<DecisionView>>;

    /// Most recent predictions for a ticker.
    async fn prediction_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<PredictionView>>;

    /// Most recent performance records for a ticker.
    async fn performance_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<PerformanceView>>;
}
