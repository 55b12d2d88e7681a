//! # Herald Configuration Errors
//!
//! Defines [`ConfigError`], returned while reading, parsing or writing a
//! [`DispatcherConfig`](crate::config::DispatcherConfig).
use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown or unsupported config format for path: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid config value for '{key}': {reason}")]
    InvalidValue {
        key: String,
        reason: String,
    },

    #[error("I/O error reading config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize config from {format}: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Failed to serialize config to {format}: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}
