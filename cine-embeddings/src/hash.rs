//! Deterministic offline embeddings.
//!
//! Feature hashing over lowercase word tokens: every token is hashed with
//! blake3 to a bucket and a sign, counts are accumulated and the vector is
//! L2-normalized. Texts sharing words land close together, which is enough
//! for offline demos and for tests that need reproducible rankings.

use crate::error::{EmbeddingError, Result};
use crate::model::{EmbedFuture, EmbeddingModel};

/// Embedder that needs no network and always returns the same vector for the same text.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    name: String,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of length `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            name: format!("hash-{}", dimension),
        }
    }

    /// Compute the embedding synchronously.
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>> {
        if self.dimension == 0 {
            return Err(EmbeddingError::ConfigError {
                message: "hash embedding dimension must be greater than 0".to_string(),
            });
        }
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let (bucket, sign) = self.slot(token.as_bytes());
            vector[bucket] += sign;
            tokens += 1;
        }

        // Punctuation-only input: fall back to hashing the raw text
        if tokens == 0 {
            let (bucket, sign) = self.slot(text.as_bytes());
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        } else {
            // Tokens cancelled out exactly; keep a non-zero vector
            vector[0] = 1.0;
        }

        Ok(vector)
    }

    fn slot(&self, bytes: &[u8]) -> (usize, f32) {
        let hash = blake3::hash(bytes);
        let bytes = hash.as_bytes();
        let mut index = [0u8; 8];
        index.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(index) % self.dimension as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

impl EmbeddingModel for HashEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        let result = self.embed_sync(text);
        Box::pin(async move { result })
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
