#![forbid(unsafe_code)]

//! Breakpoint marker insertion and removal
//!
//! The dispatcher only talks to [`MarkerEngine`]; [`PdbMarker`] is the
//! line-based implementation used by the CLI.

mod pdb;

pub use pdb::{DEFAULT_INDENT_WIDTH, DEFAULT_STATEMENT, PdbMarker};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while rewriting a source file
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Inserts and removes breakpoint markers in a single file
///
/// Both operations return how many markers were added or removed.
pub trait MarkerEngine {
    fn insert_marker(&self, path: &Path) -> Result<usize, MarkerError>;

    fn remove_marker(&self, path: &Path) -> Result<usize, MarkerError>;
}
