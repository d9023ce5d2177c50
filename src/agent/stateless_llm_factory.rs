use std::sync::Arc;
use tracing::info;

use crate::agent::stateless_llm::{EchoLLM, LlmError, OpenAICompatibleLLM, StatelessLLMInterface};
use crate::config::LlmConfig;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_DEFAULT_MODEL: &str = "gemma2-9b-it";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const OLLAMA_DEFAULT_MODEL: &str = "llama3.1";

/// Factory for creating stateless LLM instances
pub struct StatelessLLMFactory;

impl StatelessLLMFactory {
    /// Create an LLM based on the configuration.
    ///
    /// `base_url` and `model` fall back to the provider's defaults;
    /// `openai_compatible_llm` has no defaults and requires both.
    pub fn create_llm(config: &LlmConfig) -> Result<Arc<dyn StatelessLLMInterface>, LlmError> {
        info!("Initializing LLM: {}", config.provider);

        match config.provider.as_str() {
            "groq_llm" => Ok(openai_compatible(config, GROQ_BASE_URL, GROQ_DEFAULT_MODEL)),
            "openai_llm" => Ok(openai_compatible(config, OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL)),
            "ollama_llm" => Ok(openai_compatible(config, OLLAMA_BASE_URL, OLLAMA_DEFAULT_MODEL)),
            "openai_compatible_llm" => {
                let base_url = config.base_url.as_deref().ok_or_else(|| {
                    LlmError::Config("openai_compatible_llm requires base_url".to_string())
                })?;
                let model = config.model.as_deref().ok_or_else(|| {
                    LlmError::Config("openai_compatible_llm requires model".to_string())
                })?;
                Ok(openai_compatible(config, base_url, model))
            }
            "echo_llm" => Ok(Arc::new(EchoLLM)),
            other => Err(LlmError::Config(format!("Unsupported LLM provider: {}", other))),
        }
    }

    /// Whether the provider sends the configured key to a remote API.
    pub fn requires_api_key(provider: &str) -> bool {
        matches!(provider, "groq_llm" | "openai_llm")
    }
}

fn openai_compatible(
    config: &LlmConfig,
    default_base_url: &str,
    default_model: &str,
) -> Arc<dyn StatelessLLMInterface> {
    Arc::new(OpenAICompatibleLLM::new(
        config.model.clone().unwrap_or_else(|| default_model.to_string()),
        config.base_url.as_deref().unwrap_or(default_base_url),
        config.llm_api_key.clone(),
        config.temperature,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn builds_known_providers() {
        for provider in ["groq_llm", "openai_llm", "ollama_llm", "echo_llm"] {
            assert!(
                StatelessLLMFactory::create_llm(&llm_config(provider)).is_ok(),
                "{provider} should be supported"
            );
        }
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = StatelessLLMFactory::create_llm(&llm_config("mystery_llm"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported LLM provider: mystery_llm"));
    }

    #[test]
    fn generic_provider_needs_base_url_and_model() {
        let mut config = llm_config("openai_compatible_llm");
        assert!(StatelessLLMFactory::create_llm(&config).is_err());

        config.base_url = Some("http://localhost:1234/v1".to_string());
        assert!(StatelessLLMFactory::create_llm(&config).is_err());

        config.model = Some("local-model".to_string());
        assert!(StatelessLLMFactory::create_llm(&config).is_ok());
    }
}
