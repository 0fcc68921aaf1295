mod support;

use std::sync::Mutex;

use augury::adapter::outbound::provider::settings::ProviderSource;
use augury::error::{ConfigError, Error};
use augury::infrastructure::config::settings::{Config, DATABASE_ENV};
use tempfile::TempDir;

use support::config::{template, write_config, SIMULATED};

/// Serializes tests that read or write `AUGURY_DATABASE`.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn expect_invalid(toml: &str, expected: &str) {
    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue { field, .. })) => {
            assert_eq!(field, expected, "wrong field rejected for:\n{toml}");
        }
        Err(err) => panic!("expected invalid `{expected}`, got {err}"),
        Ok(_) => panic!("expected `{expected}` to be rejected:\n{toml}"),
    }
}

#[test]
fn template_parses_to_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::remove_var(DATABASE_ENV);

    let config = Config::parse_toml(template()).expect("template should be valid");
    let defaults = Config::default();

    assert_eq!(
        config.orchestrator.cycle_interval_secs,
        defaults.orchestrator.cycle_interval_secs
    );
    assert_eq!(
        config.orchestrator.grace_period_secs,
        defaults.orchestrator.grace_period_secs
    );
    assert_eq!(config.feedback.maturation_days, 7);
    assert_eq!(config.decision.threshold, 0.4);
    assert_eq!(config.providers.source, ProviderSource::Yahoo);
    assert_eq!(
        config.enabled_strategies(),
        vec!["momentum", "mean_reversion", "sentiment_momentum"]
    );
    assert!(config.database.path.is_none());
}

#[test]
fn empty_file_uses_defaults() {
    let config = Config::parse_toml("").unwrap();
    let orchestrator = config.orchestrator_config();

    assert_eq!(orchestrator.cycle_interval.as_secs(), 30);
    assert_eq!(orchestrator.grace_period.as_secs(), 10);
    assert_eq!(orchestrator.history_window, 90);
    assert_eq!(orchestrator.decision.threshold, 0.4);
    assert_eq!(orchestrator.feedback.maturation.num_days(), 7);

    let book = config.weight_book();
    assert_eq!(book.initial_weight, 1.0);
    assert_eq!(book.rule.bounds.min, 0.1);
    assert_eq!(book.rule.bounds.max, 2.0);
}

#[test]
fn load_reads_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        &format!("{SIMULATED}\n[orchestrator]\ncycle_interval_secs = 60\ngrace_period_secs = 20\n"),
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.providers.source, ProviderSource::Simulated);
    assert_eq!(config.orchestrator.cycle_interval_secs, 60);
    assert_eq!(config.orchestrator.grace_period_secs, 20);
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn malformed_toml_is_parse_error() {
    let result = Config::parse_toml("[orchestrator\ncycle_interval_secs = 3");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn database_env_overrides_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    std::env::set_var(DATABASE_ENV, "/tmp/from-env.db");
    let config = Config::parse_toml("[database]\npath = \"from-file.db\"\n");
    std::env::remove_var(DATABASE_ENV);

    assert_eq!(
        config.unwrap().database.path.as_deref(),
        Some("/tmp/from-env.db")
    );
}

#[test]
fn blank_database_env_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    std::env::set_var(DATABASE_ENV, "  ");
    let config = Config::parse_toml("[database]\npath = \"from-file.db\"\n");
    std::env::remove_var(DATABASE_ENV);

    assert_eq!(config.unwrap().database.path.as_deref(), Some("from-file.db"));
}

#[test]
fn grace_must_be_shorter_than_interval() {
    expect_invalid(
        "[orchestrator]\ncycle_interval_secs = 10\ngrace_period_secs = 10\n",
        "grace_period_secs",
    );
}

#[test]
fn zero_interval_is_rejected() {
    expect_invalid("[orchestrator]\ncycle_interval_secs = 0\n", "cycle_interval_secs");
}

#[test]
fn zero_history_window_is_rejected() {
    expect_invalid("[orchestrator]\nhistory_window = 0\n", "history_window");
}

#[test]
fn threshold_must_be_a_share() {
    expect_invalid("[decision]\nthreshold = 1.0\n", "threshold");
    expect_invalid("[decision]\nthreshold = 0.0\n", "threshold");
}

#[test]
fn weight_bounds_must_bracket_initial_weight() {
    expect_invalid("[feedback]\ninitial_weight = 3.0\n", "initial_weight");
    expect_invalid("[feedback]\nmin_weight = 0.0\n", "initial_weight");
}

#[test]
fn learning_rate_is_bounded() {
    expect_invalid("[feedback]\nlearning_rate = 1.5\n", "learning_rate");
}

#[test]
fn zero_maturation_is_rejected() {
    expect_invalid("[feedback]\nmaturation_days = 0\n", "maturation_days");
}

#[test]
fn unknown_and_duplicate_strategies_are_rejected() {
    expect_invalid("[strategies]\nenabled = [\"astrology\"]\n", "strategies.enabled");
    expect_invalid(
        "[strategies]\nenabled = [\"momentum\", \"Momentum\"]\n",
        "strategies.enabled",
    );
}

#[test]
fn strategy_names_are_normalized() {
    let config =
        Config::parse_toml("[strategies]\nenabled = [\" Mean-Reversion \", \"MOMENTUM\"]\n")
            .unwrap();
    assert_eq!(config.enabled_strategies(), vec!["mean_reversion", "momentum"]);
}

#[test]
fn bad_provider_url_is_rejected() {
    expect_invalid("[providers.yahoo]\nchart_url = \"not a url\"\n", "chart_url");
}

#[test]
fn simulated_volatility_is_bounded() {
    expect_invalid("[providers.simulated]\nvolatility = 1.0\n", "volatility");
}
