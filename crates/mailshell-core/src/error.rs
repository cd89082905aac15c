//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external program could not be started.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An invocation had no program to run.
    #[error("Empty command line")]
    EmptyCommand,

    /// An action needed a selection (account, folder, header) that is not set.
    #[error("{0}")]
    MissingSelection(String),

    /// A user-supplied search pattern did not compile.
    #[error("Invalid search pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Settings file could not be read or parsed.
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
