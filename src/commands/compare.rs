//! `apidup compare` - similarity breakdown for one pair

use serde::Serialize;
use tracing::debug;

use super::dispatch::CommandContext;
use super::report::format_breakdown;
use crate::cli::{CompareArgs, OutputFormat};
use apidup_core::api::ApiSpec;
use apidup_core::duplicates::Severity;
use apidup_core::error::Result;
use apidup_core::similarity::{SimilarityEngine, SimilarityScore};

#[derive(Serialize)]
struct Comparison<'a> {
    first: &'a ApiSpec,
    second: &'a ApiSpec,
    similarity: SimilarityScore,
    severity: Severity,
    recommendation: String,
}

pub fn execute(ctx: &CommandContext, args: &CompareArgs) -> Result<()> {
    let config = ctx.load_config()?;
    config.validate()?;

    let database = ctx.load_database()?;
    let first = database.require(&args.first)?;
    let second = database.require(&args.second)?;

    let embedder = config.embedder()?;
    let mut engine = SimilarityEngine::new(&embedder);
    let similarity = engine.score(first, second)?;
    debug!(elapsed = ?ctx.start.elapsed(), "compare");

    let severity = Severity::from_overall(similarity.overall);
    let comparison = Comparison {
        first,
        second,
        similarity,
        severity,
        recommendation: severity.recommendation(),
    };

    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        OutputFormat::Human => {
            println!("{}", comparison.first);
            println!("{}", comparison.second);
            println!();
            println!("overall {:.2}", comparison.similarity.overall);
            println!("{}", format_breakdown(&comparison.similarity));
            if !ctx.cli.quiet {
                println!("{}", comparison.recommendation);
            }
        }
    }
    Ok(())
}
