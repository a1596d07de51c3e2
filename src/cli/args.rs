use clap::Args;

use super::parse::{parse_comparator, parse_fraction, parse_strategy};
use apidup_core::config::{ComparatorKind, StrategyKind};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Id of the API to check
    pub id: String,

    /// Minimum composite score (0.0-1.0), overrides config
    #[arg(long, short, value_parser = parse_fraction)]
    pub threshold: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Minimum composite score (0.0-1.0), overrides config
    #[arg(long, short, value_parser = parse_fraction)]
    pub threshold: Option<f64>,

    /// Only list APIs that have duplicates
    #[arg(long)]
    pub only_duplicates: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Id of the first API
    pub first: String,

    /// Id of the second API
    pub second: String,
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Grouping strategy: linkage or kmeans
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<StrategyKind>,

    /// Similarity comparator: lexical or semantic
    #[arg(long, value_parser = parse_comparator)]
    pub comparator: Option<ComparatorKind>,

    /// Largest merged average distance (linkage)
    #[arg(long, value_parser = parse_fraction)]
    pub distance_threshold: Option<f64>,

    /// Number of clusters (kmeans)
    #[arg(long, short = 'k')]
    pub clusters: Option<usize>,

    /// Random seed (kmeans)
    #[arg(long)]
    pub seed: Option<u64>,
}
