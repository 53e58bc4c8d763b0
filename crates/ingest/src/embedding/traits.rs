use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for embedding backends (HuggingFace, OpenAI, mock).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;
}

/// Hosted embedding APIs handle flat prose better than raw extracted text;
/// newlines are folded to spaces before every call.
pub(crate) fn scrub_newlines(text: &str) -> String {
    text.replace('\n', " ")
}
