//! CLI argument parsing for apidup
//!
//! Global flags: --catalog, --config, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod args;
pub mod output;
pub mod parse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use args::{CheckArgs, ClusterArgs, CompareArgs, ScanArgs};
pub use output::OutputFormat;

/// Apidup - find duplicate and overlapping API definitions
#[derive(Parser, Debug)]
#[command(name = "apidup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog file of normalized API records (.json, .yaml or .yml)
    #[arg(long, global = true, env = "APIDUP_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Configuration file (defaults to ./apidup.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_parser = output::format_parser(), default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `debug` or `apidup_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report duplicates of one registered API
    Check(CheckArgs),

    /// Report duplicates for every API in the catalog
    Scan(ScanArgs),

    /// Show the similarity breakdown for two APIs
    Compare(CompareArgs),

    /// Group the catalog into similarity clusters
    Cluster(ClusterArgs),
}
