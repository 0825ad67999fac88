//! `rustedreact tools` — List the built-in tools.

use rustedreact_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = rustedreact_tools::default_registry(&config.tools)?;

    println!();
    println!("  Available tools ({}):", registry.len());
    println!();
    for line in registry.describe_all() {
        println!("    - {line}");
    }
    println!();
    Ok(())
}
