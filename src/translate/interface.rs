//! Wire types of the `/chain` route family

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInput {
    pub language: String,
    pub text: String,
}

impl ChainInput {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Body of `POST /chain/invoke`. `config` and `kwargs` are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub input: ChainInput,
    #[serde(default = "empty_object")]
    pub config: Value,
    #[serde(default = "empty_object")]
    pub kwargs: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub inputs: Vec<ChainInput>,
    #[serde(default = "empty_object")]
    pub config: Value,
    #[serde(default = "empty_object")]
    pub kwargs: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub output: String,
    pub metadata: RunMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub feedback_tokens: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub output: Vec<String>,
    pub metadata: BatchMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub run_ids: Vec<Uuid>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl InvokeRequest {
    pub fn new(input: ChainInput) -> Self {
        Self {
            input,
            config: empty_object(),
            kwargs: empty_object(),
        }
    }
}

impl InvokeResponse {
    pub fn new(output: String) -> Self {
        Self {
            output,
            metadata: RunMetadata {
                run_id: Uuid::new_v4(),
                feedback_tokens: Vec::new(),
            },
        }
    }
}

impl BatchResponse {
    pub fn new(output: Vec<String>) -> Self {
        let run_ids = output.iter().map(|_| Uuid::new_v4()).collect();
        Self {
            output,
            metadata: BatchMetadata { run_ids },
        }
    }
}
