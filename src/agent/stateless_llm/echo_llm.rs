use async_trait::async_trait;

use super::stateless_llm_interface::{ChatMessage, LlmError, Role, StatelessLLMInterface};

/// Offline provider: replies with the last user message unchanged.
pub struct EchoLLM;

#[async_trait]
impl StatelessLLMInterface for EchoLLM {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        Ok(messages
            .into_iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content)
            .unwrap_or_default())
    }
}
