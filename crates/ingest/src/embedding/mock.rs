use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use super::traits::{Embedder, EmbeddingError};

/// Deterministic fake embedder for tests and provider-less deployments.
///
/// The same text always maps to the same L2-normalized vector, so nearest-
/// neighbor search behaves consistently across runs. Vectors carry no
/// semantic signal; this backend only exercises the pipeline.
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let hash = hasher.finish();

        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|i| {
                let seed = hash.wrapping_add(i as u64).wrapping_mul(2_654_435_761);
                (((seed as f64).sin() + 1.0) / 2.0 - 0.5) as f32
            })
            .collect();

        let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let embedder = MockEmbedder::new(384);
        let a = embedder.embed_batch(&["hello world"]).await.unwrap();
        let b = embedder.embed_batch(&["hello world"]).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn different_texts_differ() {
        let embedder = MockEmbedder::new(384);
        let out = embedder.embed_batch(&["alpha", "beta"]).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_ne!(out[0], out[1]);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let embedder = MockEmbedder::new(384);
        let out = embedder.embed_batch(&["some chunk of text"]).await.unwrap();
        let magnitude = out[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4, "magnitude was {magnitude}");
    }

    #[tokio::test]
    async fn respects_requested_dimensions() {
        let embedder = MockEmbedder::new(16);
        let out = embedder.embed_batch(&["x"]).await.unwrap();
        assert_eq!(out[0].len(), 16);
        assert_eq!(embedder.dimensions(), 16);
    }
}
