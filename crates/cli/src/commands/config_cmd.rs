//! `rustedreact config` — Configuration management commands.

use rustedreact_config::AppConfig;
use std::path::Path;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", render_redacted(&config)?);
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    if write_default(&config_path)? {
        println!("  Wrote default configuration to {}", config_path.display());
    } else {
        println!("  Config already exists at {}", config_path.display());
    }
    Ok(())
}

/// Write the default config to `path` unless a file is already there.
fn write_default(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}

/// Serialize `config` as TOML with the API key masked.
fn render_redacted(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("[REDACTED]".into());
    }
    toml::to_string_pretty(&shown)
}
