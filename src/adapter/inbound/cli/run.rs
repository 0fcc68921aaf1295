//! Handler for the `run` command.

use std::path::Path;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{operator, output, paths};
use crate::error::Result;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot};

/// Execute the run command.
pub async fn execute(args: &RunArgs, database: Option<&Path>) -> Result<()> {
    let config_toml = operator::read_config_toml(args.config.as_deref())?;
    let machine_output = output::is_json();
    let request = build_run_request(args, config_toml, database, machine_output);
    let service = operator::operator();

    let startup = service.prepare_run(&request)?;
    operator::prepare_database_dir(Path::new(&startup.database))?;
    if !output::is_quiet() || machine_output {
        print_startup_config(&startup);
    }

    service.execute_run(request).await
}

fn build_run_request(
    args: &RunArgs,
    config_toml: String,
    database: Option<&Path>,
    force_json_logs: bool,
) -> RunRequest {
    let strategies = args.strategies.as_ref().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    });

    RunRequest {
        config_toml,
        database_path: database.map(|path| path.to_string_lossy().into_owned()),
        default_database: paths::default_database().to_string_lossy().into_owned(),
        log_level: args.log_level.clone(),
        json_logs: args.json_logs || force_json_logs,
        interval_secs: args.interval,
        grace_secs: args.grace,
        simulated: args.simulated,
        strategies,
    }
}

fn print_startup_config(snapshot: &RunStartupSnapshot) {
    let strategies_display = if snapshot.enabled_strategies.is_empty() {
        "none".to_string()
    } else {
        snapshot.enabled_strategies.join(", ")
    };

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Provider", &snapshot.provider);
    output::field("Strategies", &strategies_display);
    output::field("Interval", format!("{}s", snapshot.cycle_interval_secs));
    if output::verbosity() > 0 {
        output::field("Grace", format!("{}s", snapshot.grace_period_secs));
        output::field("Maturation", format!("{} days", snapshot.maturation_days));
    }
    output::field("Database", &snapshot.database);

    if snapshot.enabled_strategies.is_empty() {
        output::warning("No strategies enabled - every decision will be hold");
    }
    output::hint("press Ctrl+C to stop");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::adapter::inbound::cli::command::{Cli, Commands};

    fn run_args(argv: &[&str]) -> RunArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn strategies_are_split_and_trimmed() {
        let args = run_args(&["augury", "run", "--strategies", " momentum, ,mean_reversion "]);
        let request = build_run_request(&args, String::new(), None, false);

        assert_eq!(
            request.strategies,
            Some(vec!["momentum".to_string(), "mean_reversion".to_string()])
        );
    }

    #[test]
    fn json_output_forces_json_logs() {
        let args = run_args(&["augury", "run"]);
        let request = build_run_request(&args, String::new(), None, true);
        assert!(request.json_logs);
    }

    #[test]
    fn database_flag_becomes_the_override() {
        let args = run_args(&["augury", "run", "--simulated", "--interval", "5"]);
        let request = build_run_request(&args, String::new(), Some(Path::new("/tmp/x.db")), false);

        assert_eq!(request.database_path.as_deref(), Some("/tmp/x.db"));
        assert!(request.default_database.ends_with("augury.db"));
        assert!(request.simulated);
        assert_eq!(request.interval_secs, Some(5));
    }
}
