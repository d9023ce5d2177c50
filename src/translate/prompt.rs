use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::agent::stateless_llm::{ChatMessage, Role};

pub const TRANSLATION_SYSTEM_TEMPLATE: &str = "Translate the following into {language}:";
pub const TRANSLATION_USER_TEMPLATE: &str = "{text}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing prompt variable: {0}")]
    MissingVariable(String),
}

/// Ordered chat messages with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    messages: Vec<(Role, String)>,
}

impl PromptTemplate {
    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = (Role, S)>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(|(r, t)| (r, t.into())).collect(),
        }
    }

    /// System instruction naming the target language, then the source text.
    pub fn translation() -> Self {
        Self::from_messages([
            (Role::System, TRANSLATION_SYSTEM_TEMPLATE),
            (Role::User, TRANSLATION_USER_TEMPLATE),
        ])
    }

    /// Placeholder names in order of first appearance.
    pub fn input_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (_, template) in &self.messages {
            for caps in PLACEHOLDER.captures_iter(template) {
                let name = &caps[1];
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Substitute placeholders. Substituted values are not rescanned, so
    /// braces in user text pass through untouched.
    pub fn format(&self, vars: &HashMap<&str, &str>) -> Result<Vec<ChatMessage>, PromptError> {
        self.messages
            .iter()
            .map(|(role, template)| {
                let mut missing = None;
                let content = PLACEHOLDER.replace_all(template, |caps: &Captures| {
                    match vars.get(&caps[1]) {
                        Some(value) => value.to_string(),
                        None => {
                            missing.get_or_insert_with(|| caps[1].to_string());
                            String::new()
                        }
                    }
                });
                if let Some(name) = missing {
                    return Err(PromptError::MissingVariable(name));
                }
                Ok(ChatMessage::new(*role, content.into_owned()))
            })
            .collect()
    }
}
