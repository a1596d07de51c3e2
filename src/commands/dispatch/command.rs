//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use crate::cli::Cli;
use apidup_core::catalog::{load_database, ApiDatabase};
use apidup_core::config::ApidupConfig;
use apidup_core::error::{ApidupError, Result};

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// `--config` file, else `apidup.toml` in the working directory, else defaults
    pub fn load_config(&self) -> Result<ApidupConfig> {
        let config = ApidupConfig::discover(self.cli.config.as_deref(), self.root)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), "load_config");
        Ok(config)
    }

    /// Load the catalog named by `--catalog`
    pub fn load_database(&self) -> Result<ApiDatabase> {
        let path = self.cli.catalog.as_ref().ok_or_else(|| {
            ApidupError::UsageError(
                "no catalog given (use --catalog <FILE> or APIDUP_CATALOG)".to_string(),
            )
        })?;
        let path = if path.is_absolute() {
            path.clone()
        } else {
            self.root.join(path)
        };

        let database = load_database(&path)?;
        tracing::debug!(
            apis = database.len(),
            elapsed = ?self.start.elapsed(),
            "load_catalog"
        );
        Ok(database)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("apidup {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Find duplicate and overlapping API definitions.");
        println!();
        println!("Run `apidup --help` for usage information.");
        Ok(())
    }
}
