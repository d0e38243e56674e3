use thiserror::Error;

/// Application error types
///
/// Pricing itself never fails: unknown rate keys and malformed numbers
/// degrade to a zero cost. These variants cover everything around it.
#[derive(Debug, Error)]
pub enum CostError {
    /// Configuration could not be loaded, parsed, or validated
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Legacy configuration could not be upgraded
    #[error("Migration error: {0}")]
    MigrationError(String),
    /// Invalid edit against the in-memory session
    #[error("Session error: {0}")]
    SessionError(String),
    /// Workbook rendering failed
    #[error("Export error: {0}")]
    ExportError(String),
    /// Filesystem error while reading or writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CostError {
    /// Short machine-readable name, used in JSON log records
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config_error",
            Self::MigrationError(_) => "migration_error",
            Self::SessionError(_) => "session_error",
            Self::ExportError(_) => "export_error",
            Self::Io(_) => "io_error",
        }
    }
}

impl From<config::ConfigError> for CostError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CostError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::ExportError(err.to_string())
    }
}

impl From<toml::ser::Error> for CostError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigError(format!("TOML error: {}", err))
    }
}
