//! Shared test doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use crate::agent::stateless_llm::{ChatMessage, LlmError, Role, StatelessLLMInterface};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A base URL that accepts connections and never writes a response.
pub async fn silent_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

/// Records every prompt and replies with a fixed string, or echoes the user text.
pub struct RecordingLLM {
    reply: Option<String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingLLM {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::default(),
        }
    }

    pub fn echoing() -> Self {
        Self {
            reply: None,
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatelessLLMInterface for RecordingLLM {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let reply = match &self.reply {
            Some(reply) => reply.clone(),
            None => messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default(),
        };
        self.calls.lock().unwrap().push(messages);
        Ok(reply)
    }
}

/// Always fails the way an unavailable provider does.
pub struct FailingLLM;

#[async_trait]
impl StatelessLLMInterface for FailingLLM {
    async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}
