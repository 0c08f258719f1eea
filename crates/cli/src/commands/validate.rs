//! Validate the configuration and print a summary.

use std::path::Path;

use anyhow::{Context, Result};

use canister_env_core::config::AppConfig;

pub fn run_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => println!("  [OK] All fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    let exists = |p: &Path| if p.exists() { "found" } else { "not found" };

    println!();
    println!("Configuration summary:");
    println!(
        "  Local ids      : {} ({})",
        config.sources.local.display(),
        exists(&config.sources.local)
    );
    println!(
        "  Production ids : {} ({})",
        config.sources.production.display(),
        exists(&config.sources.production)
    );
    println!("  Network var    : {}", config.environment.network_var);
    println!("  Mode var       : {}", config.environment.mode_var);
    println!("  Build defaults : {}", config.build.defaults.len());
    println!("  Output format  : {}", config.output.format);
    println!(
        "  Output path    : {}",
        config
            .output
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );
    println!("  Log level      : {}", config.logging.level);
    println!();
    println!("Configuration is valid.");

    Ok(())
}
