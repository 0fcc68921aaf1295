//! Routes a parsed command line to its handler.

use crate::adapter::inbound::cli::command::{
    AssetCommand, Cli, ColorChoice, Commands, ConfigCommand, StrategyCommand,
};
use crate::adapter::inbound::cli::output::{self, OutputConfig};
use crate::adapter::inbound::cli::{asset, config, operator, report, run, strategy};
use crate::error::Result;

/// Apply the global flags and run the selected command.
///
/// # Errors
///
/// Returns the handler's error; `main` prints it and exits non-zero.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }

    let database = cli.database.as_deref();
    match cli.command {
        Commands::Run(args) => run::execute(&args, database).await,
        Commands::Asset(command) => {
            let db = operator::database_location(database)?;
            match command {
                AssetCommand::Add(args) => asset::execute_add(&db, &args).await,
                AssetCommand::List => asset::execute_list(&db).await,
                AssetCommand::Rename(args) => asset::execute_rename(&db, &args).await,
            }
        }
        Commands::Weights => {
            let db = operator::database_location(database)?;
            report::execute_weights(&db).await
        }
        Commands::Decisions(args) => {
            let db = operator::database_location(database)?;
            report::execute_decisions(&db, &args).await
        }
        Commands::Predictions(args) => {
            let db = operator::database_location(database)?;
            report::execute_predictions(&db, &args).await
        }
        Commands::Performance(args) => {
            let db = operator::database_location(database)?;
            report::execute_performance(&db, &args).await
        }
        Commands::Config(command) => match command {
            ConfigCommand::Init(args) => config::execute_init(args.path.as_deref(), args.force),
            ConfigCommand::Show(arg) => config::execute_show(arg.config.as_deref()),
            ConfigCommand::Validate(arg) => config::execute_validate(arg.config.as_deref()),
        },
        Commands::Strategies(command) => match command {
            StrategyCommand::List => strategy::list(),
            StrategyCommand::Explain { name } => strategy::explain(&name),
        },
    }
}
