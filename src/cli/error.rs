//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::FatalKind;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Which fatal kind this error is reported as.
    pub fn fatal_kind(&self) -> FatalKind {
        match self {
            CliError::InvalidArgs(_) => FatalKind::User,
            CliError::Application(ApplicationError::Config { .. }) => FatalKind::User,
            CliError::Application(_) => FatalKind::Internal,
        }
    }
}
