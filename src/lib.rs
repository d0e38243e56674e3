pub mod config;
pub mod error;
pub mod export;
pub mod pricing;
pub mod session;

pub use error::CostError;
pub use export::{build_report, CellValue, Report, Sheet, REPORT_FILENAME, REPORT_MIME_TYPE};
pub use pricing::{summarize, CostSummary, Estimate, PriceTable, Tier};
pub use session::Session;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format for the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Initialize tracing/logging
///
/// Logs go to stderr so estimate tables and JSON on stdout stay clean.
/// `RUST_LOG` overrides the default `warn` filter.
///
/// Note: This function can only be called once.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
