//! Command-line interface definitions.
//!
//! Defines the CLI structure for the augury application using `clap`.
//! The CLI supports subcommands for running the control loop, managing the
//! tracked assets, reading decision and weight history, and checking
//! configuration.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Adaptive ensemble of market strategies with a self-tuning trust loop
#[derive(Parser, Debug)]
#[command(name = "augury")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the SQLite database (defaults to ~/.augury/augury.db)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the augury CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the control loop (foreground, until Ctrl+C)
    Run(RunArgs),

    /// Manage tracked assets
    #[command(subcommand)]
    Asset(AssetCommand),

    /// Show the current trust weight of every strategy
    Weights,

    /// Show recent ensemble decisions for an asset
    Decisions(HistoryArgs),

    /// Show recent strategy predictions for an asset
    Predictions(HistoryArgs),

    /// Show recent performance scores for an asset
    Performance(HistoryArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Explore available strategies
    #[command(subcommand)]
    Strategies(StrategyCommand),
}

/// Subcommands for `augury asset`.
#[derive(Subcommand, Debug)]
pub enum AssetCommand {
    /// Start tracking an asset.
    Add(AssetAddArgs),
    /// List tracked assets.
    List,
    /// Change an asset's display name.
    Rename(AssetRenameArgs),
}

/// Subcommands for `augury config`.
///
/// Provides configuration management utilities including generation,
/// display, and validation of configuration files.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Subcommands for `augury strategies`.
#[derive(Subcommand, Debug)]
pub enum StrategyCommand {
    /// List all available strategies.
    List,
    /// Display detailed explanation of a specific strategy.
    Explain {
        /// Name of the strategy to explain (e.g., "momentum").
        name: String,
    },
}

/// Shared argument struct for commands that read a configuration file.
///
/// When no path is given the default file under `~/.augury/` is used if it
/// exists; otherwise every setting takes its default.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `asset add` subcommand.
#[derive(Parser, Debug)]
pub struct AssetAddArgs {
    /// Ticker symbol (e.g., AAPL, BTC-USD). Stored upper case.
    pub ticker: String,

    /// Display name (defaults to the ticker).
    #[arg(long)]
    pub name: Option<String>,

    /// Category such as stock or crypto (defaults to stock).
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the `asset rename` subcommand.
#[derive(Parser, Debug)]
pub struct AssetRenameArgs {
    /// Ticker of the asset to rename.
    pub ticker: String,

    /// New display name.
    pub name: String,
}

/// Arguments for the per-asset history subcommands.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Ticker to report on.
    pub ticker: String,

    /// Maximum number of rows, newest first.
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the `config init` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    pub path: Option<PathBuf>,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `run` subcommand.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the seconds between ticks.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Override the seconds a cycle waits for strategy replies.
    #[arg(long)]
    pub grace: Option<u64>,

    /// Use the simulated market data provider instead of Yahoo.
    #[arg(long)]
    pub simulated: bool,

    /// Comma-separated list of strategies to enable (e.g., "momentum,mean_reversion").
    #[arg(long)]
    pub strategies: Option<String>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}
