use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::traits::{scrub_newlines, Embedder, EmbeddingError};

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Embedder backed by the hosted HuggingFace inference API.
///
/// The default model (`sentence-transformers/all-MiniLM-L6-v2`) produces
/// 384-dimension vectors on the free tier.
pub struct HuggingFaceEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl HuggingFaceEmbedder {
    pub fn new(
        api_key: String,
        model: String,
        base_url: Option<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            dimensions,
        }
    }
}

#[derive(Serialize)]
struct FeatureExtractionRequest {
    inputs: Vec<String>,
    options: FeatureExtractionOptions,
}

#[derive(Serialize)]
struct FeatureExtractionOptions {
    wait_for_model: bool,
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = FeatureExtractionRequest {
            inputs: texts.iter().map(|t| scrub_newlines(t)).collect(),
            options: FeatureExtractionOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/pipeline/feature-extraction/{}",
                self.base_url, self.model
            ))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        // Sentence-embedding pipelines return one vector per input.
        let embeddings: Vec<Vec<f32>> = response.json().await?;

        if let Some(first) = embeddings.first() {
            if first.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: first.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
