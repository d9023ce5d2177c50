use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::interface::ChainInput;
use super::prompt::{PromptError, PromptTemplate};
use crate::agent::stateless_llm::{LlmError, StatelessLLMInterface};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Passes the model reply through as the chain output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl StrOutputParser {
    pub fn parse(&self, reply: String) -> String {
        reply
    }
}

/// prompt | model | parser
pub struct TranslationChain {
    prompt: PromptTemplate,
    model: Arc<dyn StatelessLLMInterface>,
    parser: StrOutputParser,
}

impl TranslationChain {
    pub fn new(model: Arc<dyn StatelessLLMInterface>) -> Self {
        Self {
            prompt: PromptTemplate::translation(),
            model,
            parser: StrOutputParser,
        }
    }

    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// One model call per invocation. Nothing is cached.
    pub async fn invoke(&self, input: &ChainInput) -> Result<String, ChainError> {
        let vars = HashMap::from([
            ("language", input.language.as_str()),
            ("text", input.text.as_str()),
        ]);
        let messages = self.prompt.format(&vars)?;

        debug!(
            language = %input.language,
            chars = input.text.chars().count(),
            "Invoking translation chain"
        );
        let reply = self.model.chat_completion(messages).await?;
        Ok(self.parser.parse(reply))
    }

    /// Runs inputs in order; the first failure fails the batch.
    pub async fn batch(&self, inputs: &[ChainInput]) -> Result<Vec<String>, ChainError> {
        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            outputs.push(self.invoke(input).await?);
        }
        Ok(outputs)
    }
}
