//! Similarity matrices and cohort grouping over a whole API set
//!
//! A [`SimilarityProvider`] turns N items into an N×N matrix and a
//! [`GroupingStrategy`] turns the matrix into one label per item. Either
//! side can be swapped independently.

mod kmeans;
mod linkage;
mod matrix;

pub use kmeans::{FixedK, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED};
pub use linkage::ThresholdLinkage;
pub use matrix::{LexicalSimilarity, SemanticSimilarity, SimilarityMatrix, SimilarityProvider};

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::ApiSpec;
use crate::error::Result;

/// Turns a similarity matrix into one cluster label per row
pub trait GroupingStrategy {
    fn name(&self) -> &'static str;

    /// Labels in row order; the caller relabels them for output
    fn group(&self, matrix: &SimilarityMatrix) -> Result<Vec<usize>>;
}

/// One API as seen by the clustering engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterItem {
    pub name: String,
    pub description: String,
    /// `"<METHOD> <path> - <description>"`, the compared text
    pub text: String,
}

impl ClusterItem {
    pub fn from_spec(spec: &ApiSpec) -> Self {
        ClusterItem {
            name: spec.display_name(),
            description: spec.description.clone(),
            text: format!("{} - {}", spec.endpoint(), spec.description),
        }
    }
}

/// Build items for a set of specs, keeping names unique.
///
/// A repeated name gets the first free `#2`, `#3`, ... suffix in order of
/// appearance, skipping suffixed names already taken by other items.
pub fn items_from_specs<'s>(specs: impl IntoIterator<Item = &'s ApiSpec>) -> Vec<ClusterItem> {
    let mut used: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut items = Vec::new();
    for spec in specs {
        let mut item = ClusterItem::from_spec(spec);
        if used.contains(&item.name) {
            let suffix = next_suffix.entry(item.name.clone()).or_insert(2);
            let mut candidate = format!("{}#{}", item.name, suffix);
            while used.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{}#{}", item.name, suffix);
            }
            *suffix += 1;
            item.name = candidate;
        }
        used.insert(item.name.clone());
        items.push(item);
    }
    items
}

/// Renumber labels 0, 1, 2, ... in the order each first appears
pub fn relabel_by_first_appearance(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

/// Item name to cluster id, in item order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterAssignment(IndexMap<String, usize>);

impl ClusterAssignment {
    pub fn new(items: &[ClusterItem], labels: &[usize]) -> Self {
        ClusterAssignment(
            items
                .iter()
                .zip(labels)
                .map(|(item, label)| (item.name.clone(), *label))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(name, label)| (name.as_str(), *label))
    }

    /// Number of distinct clusters
    pub fn cluster_count(&self) -> usize {
        self.0.values().max().map_or(0, |max| max + 1)
    }

    /// Member names per cluster id
    pub fn clusters(&self) -> Vec<Vec<&str>> {
        let mut clusters = vec![Vec::new(); self.cluster_count()];
        for (name, label) in self.iter() {
            clusters[label].push(name);
        }
        clusters
    }
}

/// A clustered API, as listed in a [`ClusterReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteredApi {
    pub name: String,
    pub description: String,
    pub cluster: usize,
}

/// Clustering result with the matrix it was computed from
#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub strategy: &'static str,
    pub comparator: &'static str,
    pub apis: Vec<ClusteredApi>,
    pub names: Vec<String>,
    pub similarity: SimilarityMatrix,
    #[serde(skip)]
    pub assignment: ClusterAssignment,
}

impl ClusterReport {
    pub fn cluster_count(&self) -> usize {
        self.assignment.cluster_count()
    }
}

/// Compute the matrix for `items` and group it.
///
/// Labels are renumbered by first appearance, so the first item is always
/// in cluster 0.
#[tracing::instrument(skip_all, fields(items = items.len(), comparator = comparator.name(), strategy = strategy.name()))]
pub fn cluster_items(
    items: Vec<ClusterItem>,
    comparator: &dyn SimilarityProvider,
    strategy: &dyn GroupingStrategy,
) -> Result<ClusterReport> {
    let start = std::time::Instant::now();
    let matrix = comparator.similarity_matrix(&items)?;
    tracing::debug!(elapsed = ?start.elapsed(), "similarity_matrix_built");

    let labels = relabel_by_first_appearance(&strategy.group(&matrix)?);
    let assignment = ClusterAssignment::new(&items, &labels);
    tracing::debug!(
        clusters = assignment.cluster_count(),
        elapsed = ?start.elapsed(),
        "clustering_complete"
    );

    let names = items.iter().map(|item| item.name.clone()).collect();
    let apis = items
        .into_iter()
        .zip(&labels)
        .map(|(item, cluster)| ClusteredApi {
            name: item.name,
            description: item.description,
            cluster: *cluster,
        })
        .collect();

    Ok(ClusterReport {
        strategy: strategy.name(),
        comparator: comparator.name(),
        apis,
        names,
        similarity: matrix,
        assignment,
    })
}

/// Cluster a set of specs
pub fn cluster_specs<'s>(
    specs: impl IntoIterator<Item = &'s ApiSpec>,
    comparator: &dyn SimilarityProvider,
    strategy: &dyn GroupingStrategy,
) -> Result<ClusterReport> {
    cluster_items(items_from_specs(specs), comparator, strategy)
}
