//! waycode-config: data directory resolution, user configuration, and
//! prompt templates.
//!
//! All durable state lives under `~/.waycode/data`: the vector store
//! database plus two flat JSON files (project memory and refactor history).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod prompts;

pub use prompts::{refactor_prompt, REFACTOR_PROMPT_TEMPLATE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Home directory not found")]
    NoHomeDir,
    #[error("GEMINI_API_KEY is not set (add it to the environment or a .env file)")]
    MissingApiKey,
}

/// Top-level waycode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaycodeConfig {
    /// Generation model ID.
    #[serde(default = "default_model")]
    pub model: String,
    /// Embedding model ID.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Decoding temperature for refactor generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Soft cap on assembled context size, in tokens. Not enforced by
    /// context assembly; carried for config-format compatibility.
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_context_tokens() -> usize {
    30_000
}

impl Default for WaycodeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

/// Resolve the waycode root directory (`~/.waycode`).
pub fn root_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".waycode"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Resolve the data directory (`~/.waycode/data`), creating it if absent.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = root_dir()?.join("data");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Path of the vector store database inside a data directory.
pub fn vector_store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("memory.db")
}

/// Path of the project memory JSON file inside a data directory.
pub fn project_memory_path(data_dir: &Path) -> PathBuf {
    data_dir.join("project_memory.json")
}

/// Path of the refactor history JSON file inside a data directory.
pub fn refactor_history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("refactor_history.json")
}

/// Load configuration from the default path (`~/.waycode/config.json5`),
/// falling back to defaults when the file does not exist.
pub fn load_config() -> Result<WaycodeConfig, ConfigError> {
    // Load .env if present so GEMINI_API_KEY can live there
    let _ = dotenvy::dotenv();

    let path = root_dir()?.join("config.json5");
    load_config_from(&path)
}

/// Load configuration from a specific path, falling back to defaults if
/// the file is missing.
pub fn load_config_from(path: &Path) -> Result<WaycodeConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(WaycodeConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: WaycodeConfig = json5::from_str(&content)?;
    Ok(config)
}

/// Read the Gemini API key from the environment.
pub fn gemini_api_key() -> Result<String, ConfigError> {
    std::env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingApiKey)
}
