use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use cloud_cost::config::to_toml_string;
use cloud_cost::Estimate;

/// Execute the init command
///
/// Writes the starter estimate (one job per tier, four lake zones, one
/// warehouse) so there is something to edit.
pub fn execute(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists, use --force to overwrite it",
            config_path.display()
        );
    }

    let contents = to_toml_string(&Estimate::default())?;
    std::fs::write(config_path, contents)?;
    info!(path = %config_path.display(), "Wrote starter estimate");

    println!(
        "{} {}",
        "✓ Starter estimate written to".green(),
        config_path.display().to_string().bold()
    );
    Ok(())
}
