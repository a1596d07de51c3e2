//! Multi-factor similarity between two API definitions
//!
//! Four sub-scores, each in `[0, 1]`, are combined with fixed weights:
//!
//! | factor     | source                                   | weight |
//! |------------|------------------------------------------|--------|
//! | path       | Jaccard of normalized path segments      | 0.25   |
//! | semantic   | cosine of description embeddings         | 0.35   |
//! | structural | method, domain and parameter overlap     | 0.25   |
//! | behavioral | Jaccard of response-schema field names   | 0.15   |
//!
//! The weights are compatibility constants for downstream thresholds.

mod calculation;

pub use calculation::{
    behavioral_similarity, jaccard, path_segments, path_similarity, structural_similarity,
    PARAM_TOKEN,
};

use serde::{Deserialize, Serialize, Serializer};

use crate::api::ApiSpec;
use crate::embedding::{CachedEmbedder, EmbeddingProvider};
use crate::error::Result;
use crate::logging::EmbeddingMetrics;

pub const PATH_WEIGHT: f64 = 0.25;
pub const SEMANTIC_WEIGHT: f64 = 0.35;
pub const STRUCTURAL_WEIGHT: f64 = 0.25;
pub const BEHAVIORAL_WEIGHT: f64 = 0.15;

/// Similarity breakdown between two API definitions, in percent (0-100).
///
/// Values keep full precision for ranking and thresholding; serialization
/// rounds each one to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityScore {
    #[serde(serialize_with = "serialize_rounded")]
    pub overall: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub path: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub semantic: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub structural: f64,
    #[serde(serialize_with = "serialize_rounded")]
    pub behavioral: f64,
}

impl SimilarityScore {
    /// Combine four `[0, 1]` sub-scores into a percent breakdown
    pub fn from_components(path: f64, semantic: f64, structural: f64, behavioral: f64) -> Self {
        let overall = PATH_WEIGHT * path
            + SEMANTIC_WEIGHT * semantic
            + STRUCTURAL_WEIGHT * structural
            + BEHAVIORAL_WEIGHT * behavioral;

        SimilarityScore {
            overall: overall * 100.0,
            path: path * 100.0,
            semantic: semantic * 100.0,
            structural: structural * 100.0,
            behavioral: behavioral * 100.0,
        }
    }

    /// Composite score as a fraction, comparable with duplicate thresholds
    pub fn overall_fraction(&self) -> f64 {
        self.overall / 100.0
    }

    /// Presentation copy with every field rounded to 2 decimals
    pub fn rounded(&self) -> Self {
        SimilarityScore {
            overall: round2(self.overall),
            path: round2(self.path),
            semantic: round2(self.semantic),
            structural: round2(self.structural),
            behavioral: round2(self.behavioral),
        }
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_rounded<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

/// Pairwise scorer holding the embedding cache for one batch of comparisons
pub struct SimilarityEngine<'a> {
    embedder: CachedEmbedder<'a>,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider) -> Self {
        SimilarityEngine {
            embedder: CachedEmbedder::new(provider),
        }
    }

    /// Embedding cache statistics for this batch
    pub fn metrics(&self) -> &EmbeddingMetrics {
        self.embedder.metrics()
    }

    /// Encode every non-empty description up front in one provider batch
    pub fn prime<'s>(&mut self, descriptions: impl IntoIterator<Item = &'s str>) -> Result<()> {
        let texts: Vec<&str> = descriptions
            .into_iter()
            .filter(|d| !d.is_empty())
            .collect();
        self.embedder.prime(&texts)
    }

    /// Cosine similarity of two descriptions; 0.0 if either is empty.
    ///
    /// Only the empty string skips the provider. Whitespace-only text is
    /// encoded like any other description.
    pub fn semantic_similarity(&mut self, desc_a: &str, desc_b: &str) -> Result<f64> {
        if desc_a.is_empty() || desc_b.is_empty() {
            return Ok(0.0);
        }
        self.embedder.similarity(desc_a, desc_b)
    }

    /// Full weighted breakdown for a pair of API definitions
    pub fn score(&mut self, a: &ApiSpec, b: &ApiSpec) -> Result<SimilarityScore> {
        let path = path_similarity(&a.path, &b.path);
        let semantic = self.semantic_similarity(&a.description, &b.description)?;
        let structural = structural_similarity(a, b);
        let behavioral = behavioral_similarity(&a.response_schema, &b.response_schema);

        let score = SimilarityScore::from_components(path, semantic, structural, behavioral);
        tracing::trace!(
            a = %a.display_name(),
            b = %b.display_name(),
            overall = score.overall,
            path = score.path,
            semantic = score.semantic,
            structural = score.structural,
            behavioral = score.behavioral,
            "pair_scored"
        );
        Ok(score)
    }
}
