//! Handlers for the history commands: `weights`, `decisions`,
//! `predictions` and `performance`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::command::HistoryArgs;
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;

#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Last score")]
    score: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

#[derive(Tabled)]
struct DecisionRow {
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Votes")]
    contributors: usize,
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "Time")]
    timestamp: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Predicted")]
    action: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Score")]
    score: String,
}

fn empty(what: &str, ticker: &str) {
    output::note(&format!("(no {what} recorded for {})", ticker.trim().to_uppercase()));
}

/// Execute `weights`.
pub async fn execute_weights(database: &str) -> Result<()> {
    let weights = operator::operator().strategy_weights(database).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "weights",
            "weights": weights.iter().map(|w| json!({
                "strategy": w.strategy,
                "weight": w.weight,
                "performance_score": w.performance_score,
                "updated_at": w.updated_at,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Strategy weights");
    if weights.is_empty() {
        output::note("(no weights yet; they are seeded when the loop first runs)");
        return Ok(());
    }
    output::table(weights.into_iter().map(|w| WeightRow {
        strategy: w.strategy,
        weight: format!("{:.4}", w.weight),
        score: w
            .performance_score
            .map_or_else(|| "-".to_string(), |s| output::signed(s, 4)),
        updated: w.updated_at,
    }));
    Ok(())
}

/// Execute `decisions <TICKER>`.
pub async fn execute_decisions(database: &str, args: &HistoryArgs) -> Result<()> {
    let decisions = operator::operator()
        .decision_history(database, &args.ticker, args.limit)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "decisions",
            "ticker": args.ticker.trim().to_uppercase(),
            "decisions": decisions.iter().map(|d| json!({
                "timestamp": d.timestamp,
                "action": d.action,
                "confidence": d.confidence,
                "rationale": d.rationale,
                "contributors": d.contributors,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Decisions");
    if decisions.is_empty() {
        empty("decisions", &args.ticker);
        return Ok(());
    }
    if output::verbosity() > 0 {
        for decision in &decisions {
            output::section(&format!("{} {}", decision.timestamp, decision.action));
            output::lines(&decision.rationale);
        }
        return Ok(());
    }
    output::table(decisions.into_iter().map(|d| DecisionRow {
        timestamp: d.timestamp,
        action: output::action(&d.action),
        confidence: format!("{:.2}", d.confidence),
        contributors: d.contributors,
    }));
    Ok(())
}

/// Execute `predictions <TICKER>`.
pub async fn execute_predictions(database: &str, args: &HistoryArgs) -> Result<()> {
    let predictions = operator::operator()
        .prediction_history(database, &args.ticker, args.limit)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "predictions",
            "ticker": args.ticker.trim().to_uppercase(),
            "predictions": predictions.iter().map(|p| json!({
                "timestamp": p.timestamp,
                "strategy": p.strategy,
                "action": p.action,
                "target_price": p.target_price,
                "confidence": p.confidence,
                "rationale": p.rationale,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Predictions");
    if predictions.is_empty() {
        empty("predictions", &args.ticker);
        return Ok(());
    }
    output::table(predictions.into_iter().map(|p| PredictionRow {
        timestamp: p.timestamp,
        strategy: p.strategy,
        action: output::action(&p.action),
        target: p.target_price.map_or_else(|| "-".to_string(), |t| format!("{t:.2}")),
        confidence: format!("{:.2}", p.confidence),
    }));
    Ok(())
}

/// Execute `performance <TICKER>`.
pub async fn execute_performance(database: &str, args: &HistoryArgs) -> Result<()> {
    let records = operator::operator()
        .performance_history(database, &args.ticker, args.limit)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "performance",
            "ticker": args.ticker.trim().to_uppercase(),
            "records": records.iter().map(|r| json!({
                "timestamp": r.timestamp,
                "strategy": r.strategy,
                "predicted_action": r.predicted_action,
                "price_change": r.price_change,
                "score": r.score,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Performance");
    if records.is_empty() {
        empty("performance records", &args.ticker);
        return Ok(());
    }
    output::table(records.into_iter().map(|r| PerformanceRow {
        timestamp: r.timestamp,
        strategy: r.strategy,
        action: output::action(&r.predicted_action),
        change: format!("{:+.2}%", r.price_change * 100.0),
        score: output::signed(r.score, 4),
    }));
    Ok(())
}
