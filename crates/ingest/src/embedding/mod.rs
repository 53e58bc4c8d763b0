pub mod cache;
pub mod huggingface;
pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use docchat_core::config::EmbeddingConfig;

pub use cache::QueryCache;
pub use huggingface::HuggingFaceEmbedder;
pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Create the embedding backend selected by config.
///
/// Selection happens once at startup from the explicit config object;
/// nothing here reads the environment at call time.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match config.provider.as_str() {
        "huggingface" => {
            let api_key = config
                .huggingface_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("HUGGINGFACE_API_KEY not set".into()))?;
            Ok(Arc::new(HuggingFaceEmbedder::new(
                api_key.clone(),
                config.huggingface_model.clone(),
                config.huggingface_base_url.clone(),
                config.dimensions,
            )))
        }
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.dimensions,
            )))
        }
        "mock" => Ok(Arc::new(MockEmbedder::new(config.dimensions))),
        other => Err(EmbeddingError::NotConfigured(format!(
            "unknown embedding provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: provider.to_string(),
            huggingface_api_key: None,
            huggingface_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            huggingface_base_url: None,
            openai_api_key: None,
            openai_model: "text-embedding-3-small".to_string(),
            openai_base_url: None,
            dimensions: 384,
            query_cache_size: 16,
        }
    }

    #[test]
    fn mock_provider_needs_no_credentials() {
        let embedder = create_embedder(&config("mock")).unwrap();
        assert_eq!(embedder.dimensions(), 384);
    }

    fn expect_err(result: Result<Arc<dyn Embedder>, EmbeddingError>) -> EmbeddingError {
        match result {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = expect_err(create_embedder(&config("cohere")));
        assert!(matches!(err, EmbeddingError::NotConfigured(_)));
    }

    #[test]
    fn huggingface_requires_api_key() {
        let err = expect_err(create_embedder(&config("huggingface")));
        assert!(matches!(err, EmbeddingError::NotConfigured(_)));
    }

    #[test]
    fn openai_requires_api_key() {
        let err = expect_err(create_embedder(&config("openai")));
        assert!(matches!(err, EmbeddingError::NotConfigured(_)));
    }
}
