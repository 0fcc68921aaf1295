//! History operator implementation.

use async_trait::async_trait;

use crate::domain::id::AssetId;
use crate::error::Result;
use crate::port::inbound::operator::report::{
    DecisionView, PerformanceView, PredictionView, ReportOperator, WeightView,
};
use crate::port::outbound::store::{DecisionStore, PerformanceStore, PredictionStore, WeightStore};

use super::{entry::Operator, shared};

#[async_trait]
impl ReportOperator for Operator {
    async fn strategy_weights(&self, database_url: &str) -> Result<Vec<WeightView>> {
        let store = shared::open_store(database_url)?;
        let weights = store.load_weights().await?;

        Ok(weights
            .into_iter()
            .map(|w| WeightView {
                strategy: w.strategy.to_string(),
                weight: w.weight,
                performance_score: w.performance_score,
                updated_at: shared::format_timestamp(w.updated_at),
            })
            .collect())
    }

    async fn decision_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<DecisionView>> {
        let asset = AssetId::try_new(ticker)?;
        let store = shared::open_store(database_url)?;
        let decisions = store.recent_decisions(&asset, limit).await?;

        Ok(decisions
            .into_iter()
            .map(|d| DecisionView {
                timestamp: shared::format_timestamp(d.timestamp),
                action: d.action.to_string(),
                confidence: d.confidence.value(),
                rationale: d.rationale,
                contributors: d.weighted_predictions.len(),
            })
            .collect())
    }

    async fn prediction_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<PredictionView>> {
        let asset = AssetId::try_new(ticker)?;
        let store = shared::open_store(database_url)?;
        let predictions = store.recent_predictions(&asset, limit).await?;

        Ok(predictions
            .into_iter()
            .map(|p| PredictionView {
                timestamp: shared::format_timestamp(p.timestamp),
                strategy: p.strategy.to_string(),
                action: p.payload.action.to_string(),
                target_price: p.payload.target_price,
                confidence: p.confidence.value(),
                rationale: p.rationale,
            })
            .collect())
    }

    async fn performance_history(
        &self,
        database_url: &str,
        ticker: &str,
        limit: usize,
    ) -> Result<Vec<PerformanceView>> {
        let asset = AssetId::try_new(ticker)?;
        let store = shared::open_store(database_url)?;
        let records = store.recent_performance(&asset, limit).await?;

        Ok(records
            .into_iter()
            .map(|r| PerformanceView {
                timestamp: shared::format_timestamp(r.timestamp),
                strategy: r.strategy.to_string(),
                predicted_action: r.predicted_action.to_string(),
                price_change: r.actual_outcome,
                score: r.performance_score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::adapter::outbound::sqlite::store::SqliteStore;
    use crate::domain::action::Action;
    use crate::domain::asset::Asset;
    use crate::domain::id::StrategyName;
    use crate::port::outbound::store::AssetStore;
    use crate::testkit::domain::prediction_at;

    #[tokio::test]
    async fn reports_read_what_the_store_wrote() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("augury.db").to_string_lossy().into_owned();
        let store = SqliteStore::open(&db).unwrap();
        let now = Utc::now();
        store
            .register_asset(&Asset::new(AssetId::new("AAPL"), "Apple", "stock"))
            .await
            .unwrap();
        store
            .seed_weight(&StrategyName::new("momentum"), 1.0, now)
            .await
            .unwrap();
        store
            .insert_prediction(&prediction_at("AAPL", "momentum", now, Action::Buy))
            .await
            .unwrap();

        let operator = Operator::new();
        let weights = operator.strategy_weights(&db).await.unwrap();
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].strategy, "momentum");
        assert!(weights[0].performance_score.is_none());

        let predictions = operator.prediction_history(&db, "aapl", 10).await.unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].action, "buy");
        assert!((predictions[0].confidence - 0.7).abs() < 1e-9);

        assert!(operator.decision_history(&db, "AAPL", 10).await.unwrap().is_empty());
        assert!(operator.performance_history(&db, "AAPL", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_ticker_is_rejected() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("augury.db").to_string_lossy().into_owned();
        assert!(Operator::new().decision_history(&db, " ", 5).await.is_err());
    }
}
