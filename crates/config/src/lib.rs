//! Configuration loading, validation, and management for RustedReact.
//!
//! Loads configuration from `~/.rustedreact/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.rustedreact/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion provider ("openrouter", "openai", "ollama", or any name with `base_url`)
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature; omitted from requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_temperature: Option<f32>,

    /// Max tokens per LLM response; omitted from requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_tokens: Option<u32>,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Built-in tool settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_model() -> String {
    "openai/gpt-3.5-turbo".into()
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
            .field("default_provider", &self.default_provider)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("tools", &self.tools)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum Thought/Action/Observation cycles per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Timeout for a single completion request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_iterations() -> u32 {
    10
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Timeout for a single tool invocation (and each HTTP request it makes)
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,

    /// National Weather Service API root
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// arXiv query endpoint
    #[serde(default = "default_arxiv_base_url")]
    pub arxiv_base_url: String,

    /// User-Agent sent by HTTP-backed tools
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_tool_timeout_secs() -> u64 {
    10
}
fn default_weather_base_url() -> String {
    "https://api.weather.gov".into()
}
fn default_arxiv_base_url() -> String {
    "http://export.arxiv.org/api/query".into()
}
fn default_user_agent() -> String {
    "ReActAgent/1.0".into()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tool_timeout_secs(),
            weather_base_url: default_weather_base_url(),
            arxiv_base_url: default_arxiv_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.rustedreact/config.toml).
    ///
    /// Also checks environment variables:
    /// - `RUSTEDREACT_API_KEY`, `OPENROUTER_API_KEY`, `OPENAI_API_KEY` (first found)
    /// - `RUSTEDREACT_PROVIDER`, `RUSTEDREACT_MODEL`, `RUSTEDREACT_BASE_URL`
    /// - `RUSTEDREACT_MAX_ITERATIONS`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
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

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = ["RUSTEDREACT_API_KEY", "OPENROUTER_API_KEY", "OPENAI_API_KEY"]
                .iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()));
        }

        if let Some(provider) = lookup("RUSTEDREACT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("RUSTEDREACT_MODEL") {
            self.default_model = model;
        }

        if let Some(url) = lookup("RUSTEDREACT_BASE_URL") {
            self.base_url = Some(url);
        }

        if let Some(raw) = lookup("RUSTEDREACT_MAX_ITERATIONS") {
            self.agent.max_iterations = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "RUSTEDREACT_MAX_ITERATIONS must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".rustedreact")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.default_temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        if self.agent.request_timeout_secs == 0 || self.tools.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// The API key, or the fatal startup error when none is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            // Local endpoints like Ollama accept any key.
            None if self.default_provider == "ollama" => Ok("ollama"),
            None => Err(ConfigError::MissingApiKey),
        }
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            base_url: None,
            default_model: default_model(),
            default_temperature: None,
            default_max_tokens: None,
            agent: AgentConfig::default(),
            tools: ToolsConfig::default(),
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

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured (set OPENROUTER_API_KEY or api_key in config.toml)")]
    MissingApiKey,
}
