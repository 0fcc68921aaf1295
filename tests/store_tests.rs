mod harness;

use std::sync::Arc;

use augury::domain::action::Action;
use augury::domain::asset::Asset;
use augury::domain::id::{AssetId, StrategyName};
use augury::domain::performance::PerformanceRecord;
use augury::domain::snapshot::{SentimentReading, Snapshot};
use augury::domain::weight::StrategyWeight;
use augury::port::outbound::store::{
    AssetStore, DecisionStore, Insertion, PerformanceStore, PredictionStore, SnapshotStore,
    WeightStore,
};
use augury::testkit::domain::prediction_at;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use harness::temp_db::TempDb;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn aapl() -> AssetId {
    AssetId::new("AAPL")
}

#[tokio::test]
async fn rows_survive_reopen() {
    let db = TempDb::create("reopen");
    let store = db.store();

    store
        .register_asset(&Asset::new(aapl(), "Apple", "stock"))
        .await
        .unwrap();
    let snapshot = Snapshot::priced(aapl(), at(1, 9), dec!(187.25), "USD", 42).unwrap();
    store.upsert_snapshot(&snapshot).await.unwrap();
    store
        .seed_weight(&StrategyName::new("momentum"), 1.0, at(1, 9))
        .await
        .unwrap();
    drop(store);

    let reopened = db.reopen();
    let assets = reopened.list_assets().await.unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].name(), "Apple");

    let stored = reopened.get_snapshot(&aapl(), at(1, 9)).await.unwrap().unwrap();
    assert_eq!(stored.price, Some(dec!(187.25)));
    assert_eq!(stored.volume, Some(42));

    let weights = reopened.load_weights().await.unwrap();
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].weight, 1.0);
}

#[tokio::test]
async fn price_and_sentiment_share_one_row() {
    let db = TempDb::with_assets("merge", &["AAPL"]).await;
    let store = db.store();
    let key = at(2, 12);

    store
        .upsert_snapshot(
            &Snapshot::priced(aapl(), key, dec!(100), "USD", 10)
                .unwrap()
                .sourced("provider.price"),
        )
        .await
        .unwrap();
    let reading = SentimentReading::try_new(0.4, 0.6, 5).unwrap();
    store
        .upsert_snapshot(&Snapshot::with_sentiment(aapl(), key, reading))
        .await
        .unwrap();

    let rows = store.recent_snapshots(&aapl(), 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.price, Some(dec!(100)));
    assert_eq!(row.sentiment_score, Some(0.4));
    assert_eq!(row.sentiment_magnitude, Some(0.6));
    assert_eq!(row.source.as_deref(), Some("provider.price"));
}

#[tokio::test]
async fn snapshots_read_newest_first() {
    let db = TempDb::with_assets("order", &["AAPL"]).await;
    let store = db.store();

    for (day, price) in [(3, dec!(10)), (1, dec!(11)), (2, dec!(12))] {
        let snapshot = Snapshot::priced(aapl(), at(day, 0), price, "USD", 1).unwrap();
        store.upsert_snapshot(&snapshot).await.unwrap();
    }

    let rows = store.recent_snapshots(&aapl(), 2).await.unwrap();
    let days: Vec<_> = rows.iter().map(|s| s.timestamp).collect();
    assert_eq!(days, vec![at(3, 0), at(2, 0)]);

    assert_eq!(store.latest_price(&aapl()).await.unwrap(), Some(dec!(10)));
    assert_eq!(
        store.first_price_after(&aapl(), at(1, 0)).await.unwrap(),
        Some(dec!(12))
    );
}

#[tokio::test]
async fn predictions_are_unique_per_strategy_and_timestamp() {
    let db = TempDb::with_assets("predictions", &["AAPL"]).await;
    let store = db.store();
    let when = at(4, 8);

    let first = prediction_at("AAPL", "momentum", when, Action::Buy);
    let again = prediction_at("AAPL", "momentum", when, Action::Sell);
    let other = prediction_at("AAPL", "mean_reversion", when, Action::Hold);

    assert_eq!(store.insert_prediction(&first).await.unwrap(), Insertion::Inserted);
    assert_eq!(store.insert_prediction(&again).await.unwrap(), Insertion::Duplicate);
    assert_eq!(store.insert_prediction(&other).await.unwrap(), Insertion::Inserted);

    let rows = store.recent_predictions(&aapl(), 10).await.unwrap();
    assert_eq!(rows.len(), 2);
    let momentum = rows
        .iter()
        .find(|p| p.strategy.as_str() == "momentum")
        .unwrap();
    assert_eq!(momentum.action(), Action::Buy);
    assert!(rows.iter().all(|p| p.id.is_some()));
}

#[tokio::test]
async fn performance_is_recorded_once_per_prediction() {
    let db = TempDb::with_assets("performance", &["AAPL"]).await;
    let store = db.store();
    let when = at(5, 8);

    store
        .insert_prediction(&prediction_at("AAPL", "momentum", when, Action::Buy))
        .await
        .unwrap();
    let cutoff = when + Duration::days(8);
    let unscored = store.unscored_predictions(&aapl(), cutoff).await.unwrap();
    assert_eq!(unscored.len(), 1);
    let id = unscored[0].id.unwrap();

    let record = PerformanceRecord {
        prediction_id: id,
        asset_id: aapl(),
        strategy: StrategyName::new("momentum"),
        timestamp: cutoff,
        predicted_action: Action::Buy,
        actual_outcome: 0.05,
        performance_score: 0.05,
    };
    assert!(store.insert_performance(&record).await.unwrap().is_inserted());
    assert_eq!(
        store.insert_performance(&record).await.unwrap(),
        Insertion::Duplicate
    );
    assert!(store.has_performance(id).await.unwrap());
    assert!(store.unscored_predictions(&aapl(), cutoff).await.unwrap().is_empty());
    assert_eq!(store.recent_performance(&aapl(), 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn saved_weight_replaces_seed() {
    let db = TempDb::create("weights");
    let store = db.store();
    let name = StrategyName::new("sentiment_momentum");

    store.seed_weight(&name, 1.0, at(6, 0)).await.unwrap();
    store
        .save_weight(&StrategyWeight {
            strategy: name.clone(),
            weight: 1.37,
            performance_score: Some(0.2),
            updated_at: at(6, 1),
        })
        .await
        .unwrap();
    assert_eq!(
        store.seed_weight(&name, 1.0, at(6, 2)).await.unwrap(),
        Insertion::Duplicate
    );

    let weights = db.reopen().load_weights().await.unwrap();
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].weight, 1.37);
    assert_eq!(weights[0].performance_score, Some(0.2));
    assert_eq!(weights[0].updated_at, at(6, 1));
}

#[tokio::test]
async fn concurrent_writers_share_the_pool() {
    let db = TempDb::with_assets("concurrent", &["MSFT"]).await;
    let store = db.store();

    let mut tasks = Vec::new();
    for hour in 0..12 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            let snapshot =
                Snapshot::priced(AssetId::new("MSFT"), at(7, hour), dec!(400), "USD", 1).unwrap();
            store.upsert_snapshot(&snapshot).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let rows = store
        .recent_snapshots(&AssetId::new("MSFT"), 100)
        .await
        .unwrap();
    assert_eq!(rows.len(), 12);
}

#[tokio::test]
async fn decisions_read_newest_first() {
    let db = TempDb::with_assets("decisions", &["AAPL"]).await;
    let store = db.store();
    let engine = augury::application::decision::engine::DecisionEngine::default();

    for day in [8, 10, 9] {
        let decision = engine.decide(&aapl(), at(day, 0), &[], &Default::default());
        store.insert_decision(&decision).await.unwrap();
    }

    let rows = store.recent_decisions(&aapl(), 10).await.unwrap();
    let days: Vec<_> = rows.iter().map(|d| d.timestamp).collect();
    assert_eq!(days, vec![at(10, 0), at(9, 0), at(8, 0)]);
    assert!(rows.iter().all(|d| d.action == Action::Hold));
}

#[tokio::test]
async fn rows_for_untracked_assets_are_rejected() {
    let db = TempDb::create("untracked");
    let store = db.store();

    let snapshot = Snapshot::priced(aapl(), at(11, 0), dec!(100), "USD", 1).unwrap();
    assert!(store.upsert_snapshot(&snapshot).await.is_err());
    assert!(store
        .insert_prediction(&prediction_at("AAPL", "momentum", at(11, 0), Action::Buy))
        .await
        .is_err());

    let reopened = db.reopen();
    assert!(reopened.recent_snapshots(&aapl(), 10).await.unwrap().is_empty());
    assert!(reopened.recent_predictions(&aapl(), 10).await.unwrap().is_empty());
}
