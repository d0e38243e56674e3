use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::{info, warn};

use cloud_cost::config::{load_config, to_toml_string, unknown_rate_keys};
use cloud_cost::PriceTable;

/// Execute the config show command
///
/// Displays the loaded estimate after migration and environment overrides
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %config_path.display(), "Loading configuration for display");

    let estimate = load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", to_toml_string(&estimate)?);

    Ok(())
}

/// Execute the config validate command
///
/// Validates the estimate file. Rate keys missing from the price tables are
/// reported as warnings; they price at zero rather than failing.
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %config_path.display(), "Validating configuration file");

    let estimate = load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Version: {}", estimate.version);
    for (tier, jobs) in estimate.jobs.iter() {
        println!("  {} jobs: {}", tier, jobs.len());
    }
    println!("  Storage mode: {:?}", estimate.storage.mode);
    println!("  Direct zones: {}", estimate.storage.direct.len());
    println!("  Table zones: {}", estimate.storage.tables.len());
    println!("  Warehouses: {}", estimate.warehouses.len());

    let unknown = unknown_rate_keys(&estimate, PriceTable::standard());
    if !unknown.is_empty() {
        println!();
        println!("{}", "Warnings (priced at $0):".yellow().bold());
        for message in &unknown {
            warn!("{}", message);
            println!("  {} {}", "!".yellow(), message);
        }
    }

    Ok(())
}
