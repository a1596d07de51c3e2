//! `apidup scan` - duplicate reports for the whole catalog

use tracing::debug;

use super::dispatch::CommandContext;
use super::report::print_report;
use crate::cli::{OutputFormat, ScanArgs};
use apidup_core::duplicates::{scan_catalog, ReportGenerator};
use apidup_core::error::Result;

pub fn execute(ctx: &CommandContext, args: &ScanArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(threshold) = args.threshold {
        config.duplicates.threshold = threshold;
    }
    config.validate()?;

    let database = ctx.load_database()?;
    let embedder = config.embedder()?;
    let generator = ReportGenerator::new(config.duplicates.savings_per_duplicate);

    let mut reports = scan_catalog(
        &embedder,
        &database,
        config.duplicates.threshold,
        &generator,
    )?;
    debug!(reports = reports.len(), elapsed = ?ctx.start.elapsed(), "scan");

    if args.only_duplicates {
        reports.retain(|report| !report.is_clean());
    }

    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Human => {
            for report in &reports {
                print_report(report, ctx.cli.verbose);
            }
            if !ctx.cli.quiet {
                let flagged = reports.iter().filter(|r| !r.is_clean()).count();
                println!();
                println!(
                    "Scanned {} API(s): {} with duplicates",
                    database.len(),
                    flagged
                );
            }
        }
    }
    Ok(())
}
