//! CLI error types with exit code handling

use helmpush_core::CoreError;
use helmpush_repo::RepoError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Wrong number or shape of positional arguments
    #[error("{message}")]
    #[diagnostic(
        code(helmpush::cli::usage),
        help("usage: helm push <chart> <repository> [flags]")
    )]
    InvalidArguments { message: String },

    /// Chart could not be found, read or packaged
    #[error(transparent)]
    #[diagnostic(code(helmpush::chart))]
    Chart(#[from] CoreError),

    /// Registry lookup, transport or server failure
    #[error(transparent)]
    #[diagnostic(code(helmpush::repo))]
    Repo(#[from] RepoError),

    /// IO error outside chart handling (temp dirs, stdout)
    #[error("IO error: {message}")]
    #[diagnostic(code(helmpush::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidArguments { .. }
            | CliError::Chart(_)
            | CliError::Repo(_)
            | CliError::Io { .. } => exit_codes::ERROR,
        }
    }

    /// Create an input error (user provided invalid arguments)
    pub fn input(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
