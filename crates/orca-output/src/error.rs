//! Error types for orca-output.

use orca_core::OrcaError;
use thiserror::Error;

/// Errors from writing output or loading a scenario.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] OrcaError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
