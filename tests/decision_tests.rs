//! Decision engine invariants over many seeded vote sets, and the way
//! learned weights shift the ensemble.

use std::collections::HashMap;
use std::sync::Arc;

use augury::application::decision::engine::{DecisionConfig, DecisionEngine, HOLD_FLOOR};
use augury::application::weight::book::{WeightBook, WeightBookConfig};
use augury::domain::action::Action;
use augury::domain::decision::Vote;
use augury::domain::id::{AssetId, StrategyName};
use augury::domain::prediction::{Confidence, PredictionPayload};
use augury::testkit::store::MemoryStore;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-9;

fn vote(strategy: &str, action: Action, confidence: f64) -> Vote {
    Vote::new(
        StrategyName::new(strategy),
        PredictionPayload::new(action, None),
        Confidence::clamped(confidence),
    )
}

fn random_votes(rng: &mut StdRng) -> (Vec<Vote>, HashMap<StrategyName, f64>) {
    let count = rng.gen_range(0..6);
    let mut votes = Vec::with_capacity(count);
    let mut weights = HashMap::new();
    for i in 0..count {
        let name = format!("s{i}");
        let action = Action::ALL[rng.gen_range(0..3)];
        votes.push(vote(&name, action, rng.gen_range(0.0..=1.0)));
        weights.insert(StrategyName::new(name), rng.gen_range(0.1..=2.0));
    }
    (votes, weights)
}

#[test]
fn decisions_respect_the_voting_rules() {
    let engine = DecisionEngine::default();
    let threshold = engine.config().threshold;
    let asset = AssetId::new("AAPL");
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2_000 {
        let (votes, weights) = random_votes(&mut rng);
        let decision = engine.decide(&asset, Utc::now(), &votes, &weights);
        let confidence = decision.confidence.value();
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(decision.weighted_predictions.len(), votes.len());

        let weighted = engine.weigh(&votes, &weights);
        let Some(scores) = engine.scores(&weighted) else {
            assert_eq!(decision.action, Action::Hold);
            assert_eq!(confidence, HOLD_FLOOR);
            continue;
        };
        assert!((scores.sum() - 1.0).abs() < EPS);

        match decision.action {
            Action::Buy => {
                assert!(scores.buy > threshold);
                assert!(scores.buy > scores.sell && scores.buy > scores.hold);
                assert!((confidence - scores.buy).abs() < EPS);
            }
            Action::Sell => {
                assert!(scores.sell > threshold);
                assert!(scores.sell > scores.buy && scores.sell > scores.hold);
                assert!((confidence - scores.sell).abs() < EPS);
            }
            Action::Hold => {
                assert!(confidence >= HOLD_FLOOR);
                assert!((confidence - scores.hold.max(HOLD_FLOOR)).abs() < EPS);
            }
        }
    }
}

#[test]
fn decisions_are_deterministic() {
    let engine = DecisionEngine::default();
    let asset = AssetId::new("BTC-USD");
    let at = Utc::now();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..200 {
        let (votes, weights) = random_votes(&mut rng);
        let first = engine.decide(&asset, at, &votes, &weights);
        let second = engine.decide(&asset, at, &votes, &weights);
        assert_eq!(first, second);
    }
}

#[test]
fn higher_threshold_turns_a_narrow_win_into_hold() {
    let votes = [
        vote("momentum", Action::Buy, 0.9),
        vote("mean_reversion", Action::Sell, 0.5),
        vote("sentiment_momentum", Action::Hold, 0.4),
    ];
    let weights = HashMap::new();
    let asset = AssetId::new("AAPL");

    let lenient = DecisionEngine::default().decide(&asset, Utc::now(), &votes, &weights);
    assert_eq!(lenient.action, Action::Buy);

    let strict = DecisionEngine::new(DecisionConfig {
        threshold: 0.6,
        ..DecisionConfig::default()
    })
    .decide(&asset, Utc::now(), &votes, &weights);
    assert_eq!(strict.action, Action::Hold);
    assert_eq!(strict.confidence.value(), HOLD_FLOOR);
}

#[tokio::test]
async fn learned_weights_flip_a_split_vote() {
    let store = Arc::new(MemoryStore::new());
    let names = [StrategyName::new("momentum"), StrategyName::new("mean_reversion")];
    let (book, _task) = WeightBook::start(store, WeightBookConfig::default(), &names)
        .await
        .unwrap();

    let votes = [
        vote("momentum", Action::Buy, 0.6),
        vote("mean_reversion", Action::Sell, 0.6),
    ];
    let engine = DecisionEngine::default();
    let asset = AssetId::new("AAPL");

    let before = engine.decide(&asset, Utc::now(), &votes, &book.weights_for(&names).await.unwrap());
    assert_eq!(before.action, Action::Hold);
    assert_eq!(before.confidence.value(), HOLD_FLOOR);

    // Mean reversion keeps getting it wrong.
    for _ in 0..5 {
        book.update_weight(&names[1], -0.5, Utc::now()).await.unwrap();
    }

    let after = engine.decide(&asset, Utc::now(), &votes, &book.weights_for(&names).await.unwrap());
    assert_eq!(after.action, Action::Buy);
    let momentum = after
        .weighted_predictions
        .iter()
        .find(|w| w.strategy == names[0])
        .unwrap();
    assert_eq!(momentum.weight, 1.0);
    assert!((momentum.weighted_confidence - 0.6).abs() < EPS);
}
