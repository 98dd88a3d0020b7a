#![forbid(unsafe_code)]

//! pdbe: drop `pdb` breakpoints under every Python function definition
//!
//! pdbe resolves a file, a directory, or a whole directory tree into a list of
//! Python sources and inserts (or clears) a breakpoint statement right after
//! each `def` signature.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod marker;
pub mod output;
pub mod types;

pub use error::{Error, Result};
