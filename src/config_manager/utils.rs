use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::debug;

/// Config files looked up in the working directory when `CONFIG_PATH` is unset.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["conf.yaml", "conf.json"];

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").expect("env var pattern is valid"));

/// Pick the configuration file to load, if any.
///
/// `CONFIG_PATH` always wins, even when the file is missing, so a typo
/// surfaces as a load error instead of silently falling back to defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Read a config file, stripping a BOM and falling back to GBK when the
/// content is not valid UTF-8.
pub fn read_config_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Configuration file not found: {}", path.display()))?;

    let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    debug!("{} is not valid UTF-8, decoding as GBK", path.display());
    let (text, _, _) = encoding_rs::GBK.decode(&bytes);
    Ok(text.into_owned())
}

/// Replace `${VAR_NAME}` with the value of the environment variable.
/// Unset variables are left as written.
pub fn substitute_env_vars(content: &str) -> Cow<'_, str> {
    ENV_VAR.replace_all(content, |caps: &Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
}

/// True when a value still holds an unresolved `${VAR}` reference.
pub fn is_unresolved(value: &str) -> bool {
    ENV_VAR.is_match(value)
}
