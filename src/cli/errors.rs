//! CLI-specific error types

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;
use crate::env::EnvError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or flag problem
    #[error("BOOTENV_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// Writing command output failed
    #[error("BOOTENV_CLI_IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    /// An input file named on the command line cannot be opened
    #[error("BOOTENV_CLI_IO_ERROR: cannot open {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requested variable is not set
    #[error("BOOTENV_CLI_NOT_DEFINED: \"{0}\" not defined")]
    NotDefined(String),

    /// Store operation failed
    #[error(transparent)]
    Env(#[from] EnvError),
}

impl CliError {
    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        Self::Env(e.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
