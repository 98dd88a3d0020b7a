#![forbid(unsafe_code)]

//! Crate-level error type and process exit codes

use crate::cli::ArgumentError;
use crate::config::ConfigError;
use crate::engine::ResolveError;
use crate::marker::MarkerError;
use std::io;
use thiserror::Error;

/// Success, including help and the no-argument usage hint
pub const EXIT_SUCCESS: i32 = 0;
/// Bad command line or bad configuration
pub const EXIT_USAGE: i32 = 1;
/// A filesystem operation failed
pub const EXIT_FILESYSTEM: i32 = 2;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Every fatal condition of a pdbe run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error("cannot determine the working directory: {0}")]
    WorkingDirectory(#[source] io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Argument(_) | Error::Config(_) => EXIT_USAGE,
            Error::Resolve(_) | Error::Marker(_) | Error::WorkingDirectory(_) | Error::Output(_) => {
                EXIT_FILESYSTEM
            }
        }
    }
}
