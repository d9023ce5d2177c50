use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use tracing::warn;

use crate::config_manager::utils::{is_unresolved, read_config_text, substitute_env_vars};

/// Prefix for environment overrides, e.g. `CHATMATE__SERVICE__PORT=9000`.
pub const ENV_PREFIX: &str = "CHATMATE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub frontend: FrontendConfig,
    pub llm: LlmConfig,
}

/// Where the translation service listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub host: String,
    pub port: u16,
    /// Defaults to the address of [`ServiceConfig`].
    pub service_url: Option<String>,
    pub readiness_timeout_secs: u64,
    pub readiness_interval_ms: u64,
    /// Unset means the front-end waits for the service indefinitely.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub llm_api_key: String,
    pub temperature: f32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8501,
            service_url: None,
            readiness_timeout_secs: 30,
            readiness_interval_ms: 250,
            request_timeout_secs: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq_llm".to_string(),
            model: None,
            base_url: None,
            llm_api_key: default_api_key(),
            temperature: 0.7,
        }
    }
}

fn default_api_key() -> String {
    std::env::var("GROQ_API_KEY").unwrap_or_default()
}

impl FrontendConfig {
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load defaults, then the optional file at `path`, then `CHATMATE__*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            let content = read_config_text(path)?;
            let content = substitute_env_vars(&content);
            builder = builder.add_source(::config::File::from_str(&content, file_format(path)));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration")?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if is_unresolved(&config.llm.llm_api_key) {
            warn!("llm_api_key references an unset environment variable, using an empty key");
            config.llm.llm_api_key.clear();
        }

        Ok(config)
    }

    /// Base URL the front-end uses to reach the translation service.
    pub fn service_url(&self) -> String {
        self.frontend.service_url.clone().unwrap_or_else(|| {
            format!("http://{}:{}", self.service.host, self.service.port)
        })
    }
}

fn file_format(path: &Path) -> ::config::FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ::config::FileFormat::Json,
        _ => ::config::FileFormat::Yaml,
    }
}
