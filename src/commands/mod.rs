//! Command implementations for the CLI
//!
//! This module contains the implementation of all CLI commands:
//! - estimate: Print the cost summary
//! - export: Write the spreadsheet report
//! - init: Write a starter estimate file
//! - rates: Print the price tables
//! - config: Configuration display and validation

pub mod config;
pub mod estimate;
pub mod export;
pub mod init;
pub mod rates;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Table with the layout every command uses
pub(crate) fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

pub(crate) fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}
