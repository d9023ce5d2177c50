use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::stateless_llm_interface::{ChatMessage, LlmError, StatelessLLMInterface};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI compatible LLM implementation
/// Talks to any `/chat/completions` endpoint (Groq, OpenAI, Ollama, ...)
pub struct OpenAICompatibleLLM {
    client: Client,
    model: String,
    url: String,
    api_key: String,
    temperature: f32,
}

impl OpenAICompatibleLLM {
    pub fn new(model: String, base_url: &str, api_key: String, temperature: f32) -> Self {
        let url = format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH);
        info!("Initialized OpenAICompatibleLLM: model={}, url={}", model, url);
        Self {
            client: Client::new(),
            model,
            url,
            api_key,
            temperature,
        }
    }
}

#[async_trait]
impl StatelessLLMInterface for OpenAICompatibleLLM {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let request = ApiRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
        };

        debug!("POST {} ({} messages)", self.url, messages.len());
        let mut builder = self.client.post(&self.url).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model provider returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response.json().await?;
        Ok(api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
