pub mod groq;
pub mod openai;
mod sse;

use std::sync::Arc;

use docchat_core::config::ChatConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat backend selected by config.
pub fn create_provider(config: &ChatConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider.as_str() {
        "groq" => {
            let api_key = config
                .groq_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GROQ_API_KEY not set".into()))?;
            Ok(Arc::new(groq::GroqProvider::new(
                api_key.clone(),
                config.groq_model.clone(),
                config.groq_base_url.clone(),
            )))
        }
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Arc::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown chat provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> ChatConfig {
        ChatConfig {
            provider: provider.to_string(),
            groq_api_key: None,
            groq_model: "llama-3.3-70b-versatile".to_string(),
            groq_base_url: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: None,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    fn expect_err(result: Result<Arc<dyn LlmProvider>, LlmError>) -> LlmError {
        match result {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        }
    }

    #[test]
    fn groq_requires_api_key() {
        let err = expect_err(create_provider(&config("groq")));
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = expect_err(create_provider(&config("anthropic")));
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn groq_constructs_with_key() {
        let mut cfg = config("groq");
        cfg.groq_api_key = Some("gsk_test".to_string());
        assert!(create_provider(&cfg).is_ok());
    }
}
