use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cloud_cost::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "cloud-cost", version, about = "Monthly cloud cost estimator")]
pub struct Cli {
    /// Estimate configuration file path
    #[arg(short, long, default_value = "estimate.toml", global = true)]
    pub config: PathBuf,

    /// Log output format (logs are written to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the monthly cost estimate (default)
    Estimate {
        /// Show per-job, per-zone and per-warehouse rows
        #[arg(short, long)]
        detailed: bool,

        /// Print the full cost summary as JSON
        #[arg(long, conflicts_with = "detailed")]
        json: bool,
    },

    /// Write the spreadsheet report
    Export {
        /// Output path (defaults to cloud_cost_report.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a starter estimate file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the compiled-in price tables
    Rates,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the loaded estimate as TOML
    Show,

    /// Validate the estimate file and list unpriced rate keys
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Estimate if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Estimate {
            detailed: false,
            json: false,
        })
    }
}
