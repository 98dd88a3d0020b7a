#![forbid(unsafe_code)]

//! Parsing of the optional `pdbe.toml` file
//!
//! ```toml
//! [marker]
//! statement = "import pdb; pdb.set_trace()"
//! indent_width = 4
//!
//! [output]
//! color = "auto"
//! ```
//!
//! Every key is optional. A missing file means all defaults.

use crate::marker::{DEFAULT_INDENT_WIDTH, DEFAULT_STATEMENT};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pdbe.toml";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse pdbe.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid marker statement {0:?}: must be a single non-empty line")]
    InvalidStatement(String),

    #[error("marker indent_width must be at least 1")]
    InvalidIndentWidth,
}

/// Top-level `pdbe.toml` contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub marker: MarkerConfig,
    pub output: OutputConfig,
}

/// `[marker]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Statement written below each signature
    pub statement: String,
    /// Spaces added past the `def` when the body indentation is unknown
    pub indent_width: usize,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            statement: DEFAULT_STATEMENT.to_string(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub color: ColorOption,
}

/// Color setting for console output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorOption> for termcolor::ColorChoice {
    fn from(option: ColorOption) -> Self {
        match option {
            ColorOption::Auto => termcolor::ColorChoice::Auto,
            ColorOption::Always => termcolor::ColorChoice::Always,
            ColorOption::Never => termcolor::ColorChoice::Never,
        }
    }
}

impl Config {
    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `pdbe.toml` from `workdir`, or defaults when there is none
    pub fn discover(workdir: &Path) -> Result<Self, ConfigError> {
        let path = workdir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Config::default());
        }
        Self::load(&path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let statement = self.marker.statement.trim();
        if statement.is_empty() || statement.contains('\n') {
            return Err(ConfigError::InvalidStatement(
                self.marker.statement.clone(),
            ));
        }
        if self.marker.indent_width == 0 {
            return Err(ConfigError::InvalidIndentWidth);
        }
        Ok(())
    }
}
