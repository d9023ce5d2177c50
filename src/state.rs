use std::sync::Arc;
use tracing::warn;

use crate::agent::{StatelessLLMFactory, StatelessLLMInterface};
use crate::config::Config;
use crate::translate::TranslationChain;

/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chain: Arc<TranslationChain>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        if config.llm.llm_api_key.is_empty()
            && StatelessLLMFactory::requires_api_key(&config.llm.provider)
        {
            warn!(
                "No API key configured for {}; set GROQ_API_KEY or llm.llm_api_key",
                config.llm.provider
            );
        }

        let model = StatelessLLMFactory::create_llm(&config.llm)?;
        Ok(Self::with_model(config, model))
    }

    pub fn with_model(config: Config, model: Arc<dyn StatelessLLMInterface>) -> Self {
        Self {
            config: Arc::new(config),
            chain: Arc::new(TranslationChain::new(model)),
        }
    }
}
