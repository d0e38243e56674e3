use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use cloud_cost::config::load_config;
use cloud_cost::{Session, REPORT_FILENAME};

/// Execute the export command
///
/// Writes the three-sheet workbook to `output`, or `cloud_cost_report.xlsx`
/// in the current directory.
pub fn execute(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let estimate = load_config(config_path)?;
    let session = Session::new(estimate);
    let report = session.report();

    let path = output.unwrap_or_else(|| PathBuf::from(REPORT_FILENAME));
    info!(path = %path.display(), sheets = report.sheets.len(), "Exporting cost report");
    report.write_to(&path)?;

    println!(
        "{} {}",
        "✓ Report written to".green(),
        path.display().to_string().bold()
    );
    for sheet in &report.sheets {
        println!("  {}: {} rows", sheet.name, sheet.rows.len());
    }

    Ok(())
}
