//! Built-in tool implementations for RustedReact.
//!
//! Tools give the agent the ability to interact with the world:
//! do math, read the clock, check the US weather forecast and search
//! arXiv for papers.

pub mod arxiv;
pub mod calculator;
pub mod clock;
pub mod weather;

use rustedreact_config::ToolsConfig;
use rustedreact_core::error::{Error, ToolError};
use rustedreact_core::tool::{ToolParams, ToolRegistry};
use std::time::Duration;

/// Create the default tool registry with all built-in tools.
///
/// Registration order is `calculator`, `get_current_time`, `get_weather`,
/// `search_arxiv`; it is the order tools are listed to the model.
pub fn default_registry(config: &ToolsConfig) -> rustedreact_core::Result<ToolRegistry> {
    let client = http_client(config).map_err(|e| Error::Config {
        message: format!("failed to build HTTP client: {e}"),
    })?;

    let mut registry =
        ToolRegistry::new().with_call_timeout(Duration::from_secs(config.timeout_secs));
    registry.register(Box::new(calculator::CalculatorTool))?;
    registry.register(Box::new(clock::CurrentTimeTool))?;
    registry.register(Box::new(weather::WeatherTool::new(
        client.clone(),
        &config.weather_base_url,
    )))?;
    registry.register(Box::new(arxiv::ArxivTool::new(
        client,
        &config.arxiv_base_url,
    )))?;
    Ok(registry)
}

/// Shared client for the HTTP-backed tools.
pub fn http_client(config: &ToolsConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

/// Read an optional numeric parameter. Numeric strings are accepted.
pub(crate) fn number_param(params: &ToolParams, key: &str) -> Result<Option<f64>, ToolError> {
    let value = match params.get(key) {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ToolError::InvalidArguments(format!(
            "'{key}' must be a number, got {}",
            params[key]
        ))),
    }
}
