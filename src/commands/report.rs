//! Human-readable rendering of duplicate reports

use apidup_core::duplicates::{DuplicateMatch, Report};
use apidup_core::similarity::SimilarityScore;

/// One-line score breakdown, e.g. `path 40.00  semantic 96.00 ...`
pub fn format_breakdown(score: &SimilarityScore) -> String {
    format!(
        "path {:.2}  semantic {:.2}  structural {:.2}  behavioral {:.2}",
        score.path, score.semantic, score.structural, score.behavioral
    )
}

fn format_match(duplicate: &DuplicateMatch) -> String {
    format!(
        "  {:>6.2}%  {:<8} {}",
        duplicate.similarity.overall,
        duplicate.severity.as_str(),
        duplicate.api
    )
}

/// Print a report; with `verbose` each match also gets its breakdown and
/// recommendation
pub fn print_report(report: &Report, verbose: bool) {
    let Some(summary) = &report.summary else {
        println!("{}", report.api);
        if let Some(message) = &report.message {
            println!("  {}", message);
        }
        return;
    };

    println!(
        "{}: {} duplicate(s), {} critical, estimated savings {}, priority {:?}",
        report.api,
        summary.total_duplicates,
        summary.critical_duplicates,
        summary.estimated_savings,
        summary.consolidation_priority
    );
    for duplicate in &report.duplicates {
        println!("{}", format_match(duplicate));
        if verbose {
            println!("            {}", format_breakdown(&duplicate.similarity));
            println!("            {}", duplicate.recommendation);
        }
    }
}
