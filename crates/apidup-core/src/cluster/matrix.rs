//! All-pairs similarity matrices and the providers that build them

use serde::Serialize;

use super::ClusterItem;
use crate::embedding::{cosine_similarity, CachedEmbedder, EmbeddingProvider};
use crate::error::Result;

/// Symmetric N×N similarity matrix with a unit diagonal.
///
/// Off-diagonal entries are clamped to `[0, 1]` so `1 - similarity` is a
/// valid distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        SimilarityMatrix { rows }
    }

    /// Fill the upper triangle from a pair function and mirror it.
    ///
    /// `pair` is called once per unordered pair `i < j`.
    pub fn from_pairs<F>(n: usize, mut pair: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> Result<f64>,
    {
        let mut matrix = SimilarityMatrix::identity(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let value = pair(i, j)?;
                matrix.set(i, j, value);
            }
        }
        Ok(matrix)
    }

    /// Set a symmetric pair; diagonal writes are ignored
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        if i == j {
            return;
        }
        let value = clamp_similarity(value);
        self.rows[i][j] = value;
        self.rows[j][i] = value;
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        1.0 - self.rows[i][j]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}

fn clamp_similarity(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Builds a similarity matrix over a whole item set.
///
/// Implementations are swapped at the matrix level, so a provider may
/// batch work across all items before comparing any pair.
pub trait SimilarityProvider {
    fn name(&self) -> &'static str;

    fn similarity_matrix(&self, items: &[ClusterItem]) -> Result<SimilarityMatrix>;
}

/// Character-bigram overlap of the item texts (Sørensen-Dice)
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl SimilarityProvider for LexicalSimilarity {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn similarity_matrix(&self, items: &[ClusterItem]) -> Result<SimilarityMatrix> {
        let texts: Vec<String> = items.iter().map(|item| item.text.to_lowercase()).collect();
        SimilarityMatrix::from_pairs(items.len(), |i, j| {
            Ok(strsim::sorensen_dice(&texts[i], &texts[j]))
        })
    }
}

/// Cosine similarity of embedded item texts
pub struct SemanticSimilarity<P> {
    provider: P,
}

impl<P: EmbeddingProvider> SemanticSimilarity<P> {
    pub fn new(provider: P) -> Self {
        SemanticSimilarity { provider }
    }
}

impl<P: EmbeddingProvider> SimilarityProvider for SemanticSimilarity<P> {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn similarity_matrix(&self, items: &[ClusterItem]) -> Result<SimilarityMatrix> {
        let mut embedder = CachedEmbedder::new(&self.provider);
        let texts: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
        embedder.prime(&texts)?;

        let mut vectors = Vec::with_capacity(texts.len());
        for text in &texts {
            vectors.push(embedder.vector(text)?.to_vec());
        }
        crate::log_embedding_metrics!(embedder.metrics(), "similarity_matrix");

        SimilarityMatrix::from_pairs(items.len(), |i, j| {
            Ok(cosine_similarity(&vectors[i], &vectors[j]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::FixedEmbedder;
    use crate::error::ApidupError;

    fn item(name: &str, text: &str) -> ClusterItem {
        ClusterItem {
            name: name.to_string(),
            description: String::new(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_identity() {
        let m = SimilarityMatrix::identity(3);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.distance(0, 2), 1.0);
    }

    #[test]
    fn test_set_is_symmetric_and_clamped() {
        let mut m = SimilarityMatrix::identity(3);
        m.set(0, 1, 0.4);
        m.set(1, 2, -0.3);
        m.set(0, 2, f64::NAN);
        m.set(2, 2, 0.1);

        assert_eq!(m.get(1, 0), 0.4);
        assert_eq!(m.get(2, 1), 0.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_lexical_matrix() {
        let items = vec![
            item("a", "GET /users - List users"),
            item("b", "GET /users - List users"),
            item("c", "DELETE /invoices/{id} - Remove invoice"),
        ];
        let m = LexicalSimilarity.similarity_matrix(&items).unwrap();

        assert_eq!(m.get(0, 1), 1.0);
        assert!(m.get(0, 2) < m.get(0, 1));
        assert_eq!(m.get(0, 2), m.get(2, 0));
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
        }
    }

    #[test]
    fn test_lexical_empty_set() {
        let m = LexicalSimilarity.similarity_matrix(&[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_semantic_matrix_encodes_once_per_text() {
        let provider = FixedEmbedder::new(2)
            .with("x", vec![1.0, 0.0])
            .with("y", vec![0.6, 0.8]);
        let items = vec![item("a", "x"), item("b", "y"), item("c", "x")];

        let semantic = SemanticSimilarity::new(provider);
        let m = semantic.similarity_matrix(&items).unwrap();

        assert!((m.get(0, 1) - 0.6).abs() < 1e-6);
        assert!((m.get(0, 2) - 1.0).abs() < 1e-6);
        assert_eq!(semantic.provider.calls.get(), 2);
    }

    #[test]
    fn test_semantic_provider_failure() {
        let semantic = SemanticSimilarity::new(FixedEmbedder::new(2));
        let err = semantic
            .similarity_matrix(&[item("a", "unknown")])
            .unwrap_err();
        assert!(matches!(err, ApidupError::Embedding { .. }));
    }
}
