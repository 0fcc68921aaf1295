//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output, paths};
use crate::error::{ConfigError, Result};

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

fn describe_source(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None if paths::default_config().exists() => paths::default_config().display().to_string(),
        None => "(built-in defaults)".to_string(),
    }
}

/// Execute `config init`.
pub fn execute_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path.map_or_else(paths::default_config, Path::to_path_buf);
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, CONFIG_TEMPLATE)?;
    if output::is_json() {
        output::json_output(json!({
            "command": "config.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Run: augury asset add <TICKER>");
    output::note(&format!("3. Run: augury run -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let config = operator::operator().show_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "source": describe_source(path),
            "database": config.database,
            "logging": { "level": config.log_level, "format": config.log_format },
            "provider": config.provider,
            "orchestrator": {
                "cycle_interval_secs": config.cycle_interval_secs,
                "grace_period_secs": config.grace_period_secs,
                "history_window": config.history_window,
                "provider_timeout_secs": config.provider_timeout_secs,
            },
            "decision": { "threshold": config.decision_threshold },
            "feedback": {
                "maturation_days": config.feedback.maturation_days,
                "learning_rate": config.feedback.learning_rate,
                "min_weight": config.feedback.min_weight,
                "max_weight": config.feedback.max_weight,
                "initial_weight": config.feedback.initial_weight,
            },
            "strategies": config.enabled_strategies,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Source", describe_source(path));
    output::field("Database", &config.database);
    output::field("Log level", &config.log_level);
    output::field("Log format", &config.log_format);

    output::section("Control loop");
    output::field("Provider", &config.provider);
    output::field("Interval", format!("{}s", config.cycle_interval_secs));
    output::field("Grace", format!("{}s", config.grace_period_secs));
    output::field("History", format!("{} snapshots", config.history_window));
    output::field("Timeout", format!("{}s", config.provider_timeout_secs));
    output::field("Threshold", format!("{:.2}", config.decision_threshold));

    output::section("Feedback");
    output::field("Maturation", format!("{} days", config.feedback.maturation_days));
    output::field("Learning rate", config.feedback.learning_rate);
    output::field(
        "Weight range",
        format!(
            "[{}, {}] starting at {}",
            config.feedback.min_weight, config.feedback.max_weight, config.feedback.initial_weight
        ),
    );

    output::section("Strategies");
    if config.enabled_strategies.is_empty() {
        output::note("(none enabled)");
    } else {
        for name in &config.enabled_strategies {
            output::note(&format!("- {name}"));
        }
    }

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let validation = operator::operator().validate_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "source": describe_source(path),
            "valid": true,
            "warnings": validation.warnings,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", describe_source(path));
    output::success("Config file is valid");

    if !validation.warnings.is_empty() {
        output::section("Warnings");
        for warning in &validation.warnings {
            output::warning(warning);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_template_is_valid_toml() {
        let result: std::result::Result<toml::Value, _> = toml::from_str(CONFIG_TEMPLATE);
        assert!(result.is_ok(), "CONFIG_TEMPLATE is not valid TOML");
    }

    #[test]
    fn test_config_template_names_every_section() {
        for section in [
            "[logging]",
            "[database]",
            "[orchestrator]",
            "[feedback]",
            "[decision]",
            "[providers]",
            "[strategies]",
        ] {
            assert!(CONFIG_TEMPLATE.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine").unwrap();

        assert!(execute_init(Some(&path), false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine");
    }

    #[test]
    fn test_init_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");

        execute_init(Some(&path), false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
