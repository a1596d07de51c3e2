//! `apidup cluster` - group the catalog into similarity cohorts

use tracing::debug;

use super::dispatch::CommandContext;
use crate::cli::{ClusterArgs, OutputFormat};
use apidup_core::cluster::{cluster_specs, ClusterReport};
use apidup_core::config::ApidupConfig;
use apidup_core::error::Result;

fn apply_overrides(config: &mut ApidupConfig, args: &ClusterArgs) {
    let clustering = &mut config.clustering;
    if let Some(strategy) = args.strategy {
        clustering.strategy = strategy;
    }
    if let Some(comparator) = args.comparator {
        clustering.comparator = comparator;
    }
    if let Some(distance_threshold) = args.distance_threshold {
        clustering.distance_threshold = distance_threshold;
    }
    if let Some(clusters) = args.clusters {
        clustering.clusters = clusters;
    }
    if let Some(seed) = args.seed {
        clustering.seed = seed;
    }
}

fn print_human(report: &ClusterReport, quiet: bool) {
    if !quiet {
        println!(
            "{} API(s) in {} cluster(s) ({} / {})",
            report.names.len(),
            report.cluster_count(),
            report.strategy,
            report.comparator
        );
    }
    for (id, members) in report.assignment.clusters().iter().enumerate() {
        println!();
        println!("Cluster {} ({})", id, members.len());
        for name in members {
            println!("  {}", name);
        }
    }
}

pub fn execute(ctx: &CommandContext, args: &ClusterArgs) -> Result<()> {
    let mut config = ctx.load_config()?;
    apply_overrides(&mut config, args);
    config.validate()?;

    let database = ctx.load_database()?;
    let comparator = config.comparator()?;
    let strategy = config.strategy()?;

    let report = cluster_specs(&database, comparator.as_ref(), strategy.as_ref())?;
    debug!(
        clusters = report.cluster_count(),
        elapsed = ?ctx.start.elapsed(),
        "cluster"
    );

    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => print_human(&report, ctx.cli.quiet),
    }
    Ok(())
}
