//! CLI module graph.

pub mod asset;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod operator;
pub mod output;
pub mod paths;
pub mod report;
pub mod run;
pub mod strategy;
