//! Command implementations for all apidup commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{check, cluster, compare, scan};
use apidup_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Check(args) => check::execute(ctx, args),
            Commands::Scan(args) => scan::execute(ctx, args),
            Commands::Compare(args) => compare::execute(ctx, args),
            Commands::Cluster(args) => cluster::execute(ctx, args),
        }
    }
}
