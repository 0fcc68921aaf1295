//! Strategy listing and explanation.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;

#[derive(Tabled)]
struct StrategyRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Min history")]
    min_history: usize,
    #[tabled(rename = "Signal")]
    summary: String,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// List available strategies.
pub fn list() -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let strategies = operator::operator().available_strategies();

    if output::is_json() {
        output::json_output(json!({
            "command": "strategies.list",
            "strategies": strategies.iter().map(|s| json!({
                "name": s.name,
                "min_history": s.min_history,
                "summary": s.summary,
            })).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Available strategies");
    output::table(strategies.into_iter().map(|s| StrategyRow {
        name: s.name,
        min_history: s.min_history,
        summary: s.summary,
    }));

    output::hint(&format!(
        "run {} for details",
        output::highlight("augury strategies explain <name>")
    ));

    Ok(())
}

/// Explain a specific strategy.
pub fn explain(name: &str) -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let normalized_name = normalize(name);
    let strategies = operator::operator().available_strategies();
    let found = strategies.iter().find(|s| s.name == normalized_name);

    if output::is_json() {
        let payload = match found {
            Some(strategy) => json!({
                "command": "strategies.explain",
                "strategy": strategy.name,
                "summary": strategy.summary,
                "min_history": strategy.min_history,
                "config_path": format!("strategies.{}", strategy.name),
            }),
            None => json!({
                "command": "strategies.explain",
                "status": "unknown_strategy",
                "requested": name,
                "normalized": normalized_name,
                "available": strategies.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            }),
        };
        output::json_output(payload);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));

    let Some(strategy) = found else {
        output::error(&format!("Unknown strategy: {name}"));
        let available: Vec<_> = strategies.iter().map(|s| s.name.as_str()).collect();
        output::hint(&format!("available strategies: {}", available.join(", ")));
        return Ok(());
    };

    output::section(&strategy.name);
    output::lines(&strategy.summary);
    output::field("Min history", format!("{} snapshots", strategy.min_history));
    output::lines(details(&strategy.name));
    Ok(())
}

fn details(name: &str) -> &'static str {
    match name {
        "momentum" => {
            "
Blends the 10, 30 and 90 day returns as 0.5/0.3/0.2.
Above +5% it buys, below -5% it sells, otherwise holds.
Confidence is min(0.9, |momentum| x 5).

Configuration:
  [strategies.momentum]
  short_window = 10
  medium_window = 30
  long_window = 90
  threshold = 0.05"
        }
        "mean_reversion" => {
            "
Measures how far the price sits from its 30 day mean in
standard deviations. Beyond +2 it sells, beyond -2 it buys,
targeting the mean. Confidence is min(0.9, |z| / 5).

Configuration:
  [strategies.mean_reversion]
  lookback = 30
  z_threshold = 2.0"
        }
        "sentiment_momentum" => {
            "
Averages the last 3 news sentiment scores and requires the
5 day price move to agree in sign. Buys on aligned positive
sentiment above 0.3 and sells on aligned negative sentiment.

Configuration:
  [strategies.sentiment_momentum]
  momentum_window = 5
  sentiment_window = 3
  sentiment_threshold = 0.3
  confidence_multiplier = 0.8"
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize(" Mean-Reversion "), "mean_reversion");
    }

    #[test]
    fn every_known_strategy_has_details() {
        for name in ["momentum", "mean_reversion", "sentiment_momentum"] {
            assert!(details(name).contains(&format!("[strategies.{name}]")));
        }
        assert!(details("unknown").is_empty());
    }
}
