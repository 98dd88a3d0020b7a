//! Configuration file parsing and validation

pub mod pdbe_toml;

pub use pdbe_toml::{CONFIG_FILE_NAME, ColorOption, Config, ConfigError, MarkerConfig, OutputConfig};
