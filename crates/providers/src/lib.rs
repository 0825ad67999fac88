//! LLM Provider implementations for RustedReact.
//!
//! All providers implement the `rustedreact_core::Provider` trait.
//! [`build_from_config`] selects and configures one from `AppConfig`.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use rustedreact_config::{AppConfig, ConfigError};
use rustedreact_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Build the configured completion provider.
///
/// Fails only when no API key is available for a provider that needs one.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let api_key = config.require_api_key()?;
    let base_url = config.base_url.as_deref();

    let provider = match (config.default_provider.as_str(), base_url) {
        ("openrouter", None) => OpenAiCompatProvider::openrouter(api_key),
        ("ollama", base_url) => OpenAiCompatProvider::ollama(base_url),
        (name, Some(url)) => OpenAiCompatProvider::new(name, url, api_key),
        (name, None) => OpenAiCompatProvider::new(name, default_base_url(name), api_key),
    };
    debug!(provider = provider.name(), base_url = provider.base_url(), "Provider configured");

    Ok(Arc::new(
        provider.with_timeout(Duration::from_secs(config.agent.request_timeout_secs)),
    ))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        _ => "https://openrouter.ai/api/v1".into(),
    }
}
