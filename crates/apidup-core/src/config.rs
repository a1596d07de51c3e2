//! apidup configuration
//!
//! Read from `apidup.toml` in the working directory, or the file given
//! with `--config`. Every key is optional.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cluster::{
    FixedK, GroupingStrategy, LexicalSimilarity, SemanticSimilarity, SimilarityProvider,
    ThresholdLinkage, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED,
};
use crate::duplicates::{validate_threshold, DEFAULT_SAVINGS_PER_DUPLICATE, DEFAULT_THRESHOLD};
use crate::embedding::{HashingEmbedder, DEFAULT_DIMENSIONS};
use crate::error::{ApidupError, Result};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "apidup.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApidupConfig {
    #[serde(default)]
    pub duplicates: DuplicatesConfig,

    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuplicatesConfig {
    /// Minimum composite score, as a fraction
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Estimated saving per duplicate, in report currency units
    #[serde(default = "default_savings")]
    pub savings_per_duplicate: u64,
}

impl Default for DuplicatesConfig {
    fn default() -> Self {
        DuplicatesConfig {
            threshold: DEFAULT_THRESHOLD,
            savings_per_duplicate: DEFAULT_SAVINGS_PER_DUPLICATE,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_savings() -> u64 {
    DEFAULT_SAVINGS_PER_DUPLICATE
}

/// Grouping algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Linkage,
    Kmeans,
}

impl FromStr for StrategyKind {
    type Err = ApidupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linkage" => Ok(StrategyKind::Linkage),
            "kmeans" => Ok(StrategyKind::Kmeans),
            other => Err(ApidupError::invalid_value("clustering strategy", other)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Linkage => write!(f, "linkage"),
            StrategyKind::Kmeans => write!(f, "kmeans"),
        }
    }
}

/// Matrix comparator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorKind {
    #[default]
    Lexical,
    Semantic,
}

impl FromStr for ComparatorKind {
    type Err = ApidupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(ComparatorKind::Lexical),
            "semantic" => Ok(ComparatorKind::Semantic),
            other => Err(ApidupError::invalid_value("clustering comparator", other)),
        }
    }
}

impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorKind::Lexical => write!(f, "lexical"),
            ComparatorKind::Semantic => write!(f, "semantic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusteringConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub comparator: ComparatorKind,

    /// Largest average-linkage distance still merged (linkage only)
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,

    /// Number of groups (kmeans only)
    #[serde(default = "default_clusters")]
    pub clusters: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        ClusteringConfig {
            strategy: StrategyKind::default(),
            comparator: ComparatorKind::default(),
            distance_threshold: default_distance_threshold(),
            clusters: default_clusters(),
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

fn default_distance_threshold() -> f64 {
    0.6
}

fn default_clusters() -> usize {
    3
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Stem tokens before hashing (optional; default true)
    #[serde(default = "default_stemming")]
    pub stemming: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            dimensions: DEFAULT_DIMENSIONS,
            stemming: true,
        }
    }
}

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

fn default_stemming() -> bool {
    true
}

impl ApidupConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ApidupConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config_loaded");
        Ok(config)
    }

    /// Load `path` if given, else `apidup.toml` under `dir` if present,
    /// else defaults. An explicit path that does not exist is an error.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ApidupError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold("threshold", self.duplicates.threshold)?;
        validate_threshold("distance threshold", self.clustering.distance_threshold)?;
        // clusters = 0 is only an error once there is something to cluster
        if self.clustering.max_iterations == 0 {
            return Err(ApidupError::invalid_value("max iterations", 0));
        }
        if self.embedding.dimensions == 0 {
            return Err(ApidupError::invalid_value("embedding dimensions", 0));
        }
        Ok(())
    }

    /// Built-in embedding provider with the configured settings
    pub fn embedder(&self) -> Result<HashingEmbedder> {
        HashingEmbedder::new(self.embedding.dimensions, self.embedding.stemming)
    }

    /// Matrix comparator selected by `[clustering] comparator`
    pub fn comparator(&self) -> Result<Box<dyn SimilarityProvider>> {
        Ok(match self.clustering.comparator {
            ComparatorKind::Lexical => Box::new(LexicalSimilarity),
            ComparatorKind::Semantic => Box::new(SemanticSimilarity::new(self.embedder()?)),
        })
    }

    /// Grouping strategy selected by `[clustering] strategy`
    pub fn strategy(&self) -> Result<Box<dyn GroupingStrategy>> {
        let clustering = &self.clustering;
        Ok(match clustering.strategy {
            StrategyKind::Linkage => {
                Box::new(ThresholdLinkage::new(clustering.distance_threshold)?)
            }
            StrategyKind::Kmeans => Box::new(
                FixedK::new(clustering.clusters)
                    .with_seed(clustering.seed)
                    .with_max_iterations(clustering.max_iterations),
            ),
        })
    }
}
