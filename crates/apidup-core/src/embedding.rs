//! Embedding provider capability and helpers
//!
//! The scoring engine only needs `text -> vector`. Any model can be plugged
//! in through [`EmbeddingProvider`]; the crate ships [`HashingEmbedder`], a
//! deterministic bag-of-words embedder used by the CLI and in tests.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::error::{ApidupError, Result};
use crate::logging::EmbeddingMetrics;
use crate::text::tokenize_with_stemming;

/// Default vector length of the built-in embedder
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Turns text into a fixed-length numeric vector.
///
/// Implementations must be deterministic for identical input. Calls are
/// synchronous and may block; failures are returned, never replaced by a
/// neutral vector.
pub trait EmbeddingProvider {
    /// Encode a single non-empty string
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode several strings, one vector per input, in input order
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Length of every vector this provider returns
    fn dimensions(&self) -> usize;
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when the lengths differ, either vector is empty or has zero
/// norm, or the inputs contain non-finite values.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = f64::from(*x);
        let y = f64::from(*y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() || !dot.is_finite() {
        return 0.0;
    }
    dot / denom
}

/// Per-batch cache in front of an [`EmbeddingProvider`].
///
/// Each distinct string is encoded at most once for the lifetime of the
/// cache. Create one per batch of comparisons.
pub struct CachedEmbedder<'a> {
    provider: &'a dyn EmbeddingProvider,
    cache: HashMap<String, Vec<f32>>,
    metrics: EmbeddingMetrics,
}

impl<'a> CachedEmbedder<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider) -> Self {
        CachedEmbedder {
            provider,
            cache: HashMap::new(),
            metrics: EmbeddingMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &EmbeddingMetrics {
        &self.metrics
    }

    /// Number of distinct strings encoded so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Encode every not-yet-cached string in one provider batch call
    pub fn prime(&mut self, texts: &[&str]) -> Result<()> {
        let mut missing: Vec<&str> = Vec::new();
        for text in texts {
            if self.cache.contains_key(*text) || missing.contains(text) {
                self.metrics.record_cache_hit();
            } else {
                self.metrics.record_cache_miss();
                missing.push(*text);
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        self.metrics.record_provider_call();
        let vectors = self.provider.encode_batch(&missing)?;
        if vectors.len() != missing.len() {
            return Err(ApidupError::Other(format!(
                "embedding provider returned {} vectors for {} inputs",
                vectors.len(),
                missing.len()
            )));
        }
        for (text, vector) in missing.into_iter().zip(vectors) {
            self.check_dimensions(&vector)?;
            self.cache.insert(text.to_string(), vector);
        }
        Ok(())
    }

    /// Cached vector for `text`, encoding it on first use
    pub fn vector(&mut self, text: &str) -> Result<&[f32]> {
        self.ensure(text)?;
        self.cache
            .get(text)
            .map(Vec::as_slice)
            .ok_or_else(|| ApidupError::embedding(text, "vector missing from cache"))
    }

    /// Cosine similarity of the embeddings of two strings
    pub fn similarity(&mut self, a: &str, b: &str) -> Result<f64> {
        self.ensure(a)?;
        self.ensure(b)?;
        match (self.cache.get(a), self.cache.get(b)) {
            (Some(va), Some(vb)) => Ok(cosine_similarity(va, vb)),
            _ => Err(ApidupError::embedding(a, "vector missing from cache")),
        }
    }

    fn ensure(&mut self, text: &str) -> Result<()> {
        if self.cache.contains_key(text) {
            self.metrics.record_cache_hit();
            return Ok(());
        }
        self.metrics.record_cache_miss();
        self.metrics.record_provider_call();
        let vector = self.provider.encode(text)?;
        self.check_dimensions(&vector)?;
        self.cache.insert(text.to_string(), vector);
        Ok(())
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        let expected = self.provider.dimensions();
        if vector.len() != expected {
            return Err(ApidupError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Deterministic feature-hashing embedder.
///
/// Tokens are hashed with SHA-256 into `dimensions` buckets; the count
/// vector is L2-normalized. Text without content tokens maps to the zero
/// vector, which compares as 0.0 with everything.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    stemming: bool,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize, stemming: bool) -> Result<Self> {
        if dimensions == 0 {
            return Err(ApidupError::invalid_value("embedding dimensions", 0));
        }
        Ok(HashingEmbedder {
            dimensions,
            stemming,
        })
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let hash = digest
            .iter()
            .take(8)
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        (hash % self.dimensions as u64) as usize
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        HashingEmbedder {
            dimensions: DEFAULT_DIMENSIONS,
            stemming: true,
        }
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0_f32; self.dimensions];
        for token in tokenize_with_stemming(text, self.stemming) {
            vector[self.bucket(&token)] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
