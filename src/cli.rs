//! CLI argument routing and command execution

pub mod args;
pub mod run;

// Re-export types for convenient access
pub use args::{ArgumentError, Cli, Routed, USAGE_HINT, route};
pub use run::{execute, run};
