use anyhow::Result;
use clap::Parser;
use tracing::error;

mod cli;
mod commands;

use cloud_cost::{init_tracing, CostError};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    init_tracing(args.log_format);

    let result = run(&args);
    if let Err(err) = &result {
        if let Some(cost_err) = err.downcast_ref::<CostError>() {
            error!(error_type = cost_err.type_name(), "{}", cost_err);
        }
    }
    result
}

fn run(args: &cli::Cli) -> Result<()> {
    let config_path = args.config.as_path();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Estimate { detailed, json } => {
            commands::estimate::execute(config_path, detailed, json)?;
        }
        cli::Commands::Export { output } => {
            commands::export::execute(config_path, output)?;
        }
        cli::Commands::Init { force } => {
            commands::init::execute(config_path, force)?;
        }
        cli::Commands::Rates => {
            commands::rates::execute();
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(config_path)?,
            cli::ConfigCommands::Validate => commands::config::validate(config_path)?,
        },
        cli::Commands::Version => {
            println!("Cloud Cost Estimator v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
