//! Configuration loading, validation, and management for mnemos.
//!
//! Loads configuration from `~/.mnemos/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod bots;
pub mod models;

use mnemos_core::agent::{AgentConfig, DEFAULT_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use bots::{BotBook, BotProfile};
pub use models::{MODEL_CATALOGUE, is_known_model, model_label};

/// The root configuration structure.
///
/// Maps directly to `~/.mnemos/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion and embedding endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Model used for archival memory embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Model answering `message_chatgpt`; the function is a no-op when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_model: Option<String>,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Memory settings
    #[serde(default)]
    pub memory: MemorySettings,

    /// Bot profiles
    #[serde(default)]
    pub bots: BotBook,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    models::GPT_4_TURBO.into()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("embedding_model", &self.embedding_model)
            .field("secondary_model", &self.secondary_model)
            .field("agent", &self.agent)
            .field("memory", &self.memory)
            .field("bots", &self.bots)
            .finish()
    }
}

/// `[agent]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Retries per turn, shared by transport failures and protocol violations
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Model round-trips allowed per turn
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_true")]
    pub boot_sequence: bool,

    /// Replaces every profile's system preamble when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}
fn default_max_steps() -> u32 {
    25
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_true() -> bool {
    true
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            max_steps: default_max_steps(),
            retry_backoff_ms: default_retry_backoff_ms(),
            boot_sequence: true,
            system_prompt_override: None,
        }
    }
}

/// Which embedder archival memory uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// The provider's embedding endpoint, or hash if its first call fails
    #[default]
    Provider,
    /// Local bag-of-words hashing, no network
    Hash,
}

/// `[memory]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySettings {
    #[serde(default)]
    pub embedder: EmbedderKind,

    #[serde(default = "default_hash_dimensions")]
    pub hash_dimensions: usize,

    /// Results per page for recall and archival searches
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_hash_dimensions() -> usize {
    256
}
fn default_page_size() -> usize {
    5
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            embedder: EmbedderKind::default(),
            hash_dimensions: default_hash_dimensions(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.mnemos/config.toml).
    ///
    /// Environment overrides:
    /// - `MNEMOS_API_KEY`, then `OPENAI_API_KEY` (only when the file has no key)
    /// - `MNEMOS_MODEL`
    /// - `MNEMOS_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = non_empty("MNEMOS_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"));
        }
        if let Some(model) = non_empty("MNEMOS_MODEL") {
            self.model = model;
        }
        if let Some(url) = non_empty("MNEMOS_API_URL") {
            self.api_url = url;
        }
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |reason: String| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason,
        };

        let content = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| write_error(e.to_string()))
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mnemos")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("api_url must not be empty".into()));
        }

        if self.agent.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_steps must be at least 1".into(),
            ));
        }

        if self.memory.page_size == 0 || self.memory.hash_dimensions == 0 {
            return Err(ConfigError::ValidationError(
                "memory.page_size and memory.hash_dimensions must be at least 1".into(),
            ));
        }

        if !is_known_model(&self.model) {
            tracing::warn!(model = %self.model, "Model is not in the catalogue; using it anyway");
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Derive the agent configuration from the selected bot profile.
    pub fn agent_config(&self) -> AgentConfig {
        let profile = self.bots.selected();

        let system_prompt = self
            .agent
            .system_prompt_override
            .clone()
            .or_else(|| profile.and_then(|p| p.system_prompt.clone()))
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        AgentConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            system_prompt,
            persona: profile.map(|p| p.persona.clone()).unwrap_or_default(),
            human: profile.map(|p| p.human.clone()).unwrap_or_default(),
            max_retries: self.agent.max_retries,
            max_steps: self.agent.max_steps,
            retry_backoff_ms: self.agent.retry_backoff_ms,
            boot_sequence: self.agent.boot_sequence,
            page_size: self.memory.page_size,
        }
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let mut config = Self::default();
        config.bots.create(
            BotProfile::named("Sam")
                .with_persona("The following is a starter persona.\nI am Sam. I'm curious, warm and quick-witted.")
                .with_human("First name: Chad"),
        );
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            embedding_model: default_embedding_model(),
            secondary_model: None,
            agent: AgentSettings::default(),
            memory: MemorySettings::default(),
            bots: BotBook::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No bot profile with id '{0}'")]
    UnknownBot(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gpt-4-1106-preview");
        assert_eq!(config.api_url, "https://api.openai.com/v1");
        assert!((config.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.agent.max_retries, 3);
        assert_eq!(config.memory.embedder, EmbedderKind::Provider);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let mut config = AppConfig::default();
        config.bots.create(BotProfile::named("Sam").with_persona("I am Sam."));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.bots, config.bots);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn unknown_model_is_allowed() {
        let config = AppConfig {
            model: "llama-3-70b".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.model, "gpt-4-1106-preview");
    }

    #[test]
    fn parses_sections() {
        let toml_str = r#"
model = "gpt-4"
temperature = 0.2

[agent]
max_retries = 1
boot_sequence = false

[memory]
embedder = "hash"
page_size = 3

[bots]
selected = "tutor-1"

[[bots.profiles]]
id = "sam-1"
name = "Sam"
persona = "I am Sam."

[[bots.profiles]]
id = "tutor-1"
name = "Tutor"
system_prompt = "You are a patient tutor."
human = "Student: Ana"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.max_retries, 1);
        assert_eq!(config.agent.max_steps, 25);
        assert_eq!(config.memory.embedder, EmbedderKind::Hash);

        let agent = config.agent_config();
        assert_eq!(agent.model, "gpt-4");
        assert_eq!(agent.system_prompt, "You are a patient tutor.");
        assert_eq!(agent.human, "Student: Ana");
        assert!(agent.persona.is_empty());
        assert_eq!(agent.page_size, 3);
        assert!(!agent.boot_sequence);
    }

    #[test]
    fn agent_config_without_profiles_uses_defaults() {
        let agent = AppConfig::default().agent_config();
        assert_eq!(agent.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(agent.persona.is_empty());
        assert_eq!(agent.max_steps, 25);
    }

    #[test]
    fn system_prompt_override_wins() {
        let mut config = AppConfig::default();
        config
            .bots
            .create(BotProfile::named("Sam").with_system_prompt("profile prompt"));
        config.agent.system_prompt_override = Some("global prompt".into());
        assert_eq!(config.agent_config().system_prompt, "global prompt");
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-openai"),
            ("MNEMOS_MODEL", "gpt-4"),
            ("MNEMOS_API_URL", "http://localhost:8000/v1"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.api_url, "http://localhost:8000/v1");
    }

    #[test]
    fn mnemos_key_beats_openai_key_but_not_the_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([("MNEMOS_API_KEY", "sk-mnemos"), ("OPENAI_API_KEY", "sk-openai")]);

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-mnemos"));

        let mut config = AppConfig {
            api_key: Some("sk-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        let id = config.bots.create(BotProfile::named("Sam"));
        config.bots.select(&id).unwrap();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.bots.selected().unwrap().id, id);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [unclosed").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn default_toml_has_a_starter_bot() {
        let toml_str = AppConfig::default_toml();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.bots.profiles.len(), 1);
        assert_eq!(parsed.bots.profiles[0].name, "Sam");
    }
}
