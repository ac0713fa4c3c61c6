use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::llm::client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::llm::openrouter::OPENROUTER_BASE_URL;
use crate::models::DEFAULT_MODEL;
use crate::store::json::DEFAULT_DATA_DIR;

/// File name of the optional config inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

pub const MAX_TOKENS_RANGE: std::ops::RangeInclusive<u32> = 1000..=8000;
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

/// Top-level critique configuration, matching `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CritiqueConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            dir: DEFAULT_DATA_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Root of the chat-completions API; `/chat/completions` is appended.
    pub base_url: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub min_code_length: usize,
    pub max_code_length: usize,
    pub max_project_files: usize,
    pub max_project_bytes: u64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            min_code_length: 10,
            max_code_length: 100_000,
            max_project_files: 50,
            max_project_bytes: 500 * 1024,
        }
    }
}

impl CritiqueConfig {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `config.toml` from a data directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        Self::load(&dir.join(CONFIG_FILE))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        let url = &self.llm.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "llm.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if !MAX_TOKENS_RANGE.contains(&self.llm.max_tokens) {
            return Err(ConfigError::Invalid(format!(
                "llm.max_tokens must be between {} and {}, got {}",
                MAX_TOKENS_RANGE.start(),
                MAX_TOKENS_RANGE.end(),
                self.llm.max_tokens
            )));
        }
        if !TEMPERATURE_RANGE.contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature must be between {} and {}, got {}",
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end(),
                self.llm.temperature
            )));
        }
        let limits = &self.limits;
        if limits.min_code_length == 0 || limits.min_code_length > limits.max_code_length {
            return Err(ConfigError::Invalid(format!(
                "limits.min_code_length ({}) must be at least 1 and not exceed max_code_length ({})",
                limits.min_code_length, limits.max_code_length
            )));
        }
        if limits.max_project_files == 0 || limits.max_project_bytes == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_project_files and limits.max_project_bytes must be positive".into(),
            ));
        }
        Ok(())
    }
}
