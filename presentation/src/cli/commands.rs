//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for broker answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// The aggregated answer text
    #[default]
    Text,
    /// The full answer as JSON, including per-resolver outcomes
    Json,
}

/// CLI arguments for query-broker
#[derive(Parser, Debug)]
#[command(name = "query-broker")]
#[command(author, version, about = "Query broker - fan one question out to many resolvers")]
#[command(long_about = r#"
Query Broker sends a question to a set of external resolvers and combines
their replies into one answer.

Simple questions go to every suitable resolver in one round. Compound
questions ("A and B", "Compare A and B", several questions at once) are split
into sub-queries that run concurrently.

Configuration files are loaded from (in priority order):
1. BROKER_* environment variables
2. --config <path>     Explicit config file
3. ./broker.toml       Project-level config
4. ~/.config/query-broker/config.toml   Global config

Example:
  query-broker "What is the capital of France?"
  query-broker --output json "Compare Python and Java"
  query-broker --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
