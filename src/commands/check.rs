//! `apidup check` - duplicate report for one registered API

use tracing::debug;

use super::dispatch::CommandContext;
use super::report::print_report;
use crate::cli::{CheckArgs, OutputFormat};
use apidup_core::duplicates::{DuplicateFinder, ReportGenerator};
use apidup_core::error::Result;
use apidup_core::log_embedding_metrics;

pub fn execute(ctx: &CommandContext, args: &CheckArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(threshold) = args.threshold {
        config.duplicates.threshold = threshold;
    }
    config.validate()?;

    let database = ctx.load_database()?;
    let query = database.require(&args.id)?;

    let embedder = config.embedder()?;
    let reports = ReportGenerator::new(config.duplicates.savings_per_duplicate);
    let mut finder = DuplicateFinder::new(&embedder, config.duplicates.threshold)?;
    let report = finder.check(query, &database, &reports)?;

    log_embedding_metrics!(finder.metrics(), "check");
    debug!(elapsed = ?ctx.start.elapsed(), "check");

    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            print_report(&report, ctx.cli.verbose);
        }
    }
    Ok(())
}
