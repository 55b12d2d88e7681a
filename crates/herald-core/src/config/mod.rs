pub mod error;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event::sorter::TieBreak;
pub use error::ConfigError;

/// Largest initial capacity a dispatcher will preallocate for either registry
pub const MAX_INITIAL_CAPACITY: usize = 1 << 16;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => write!(f, "YAML"),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => write!(f, "TOML"),
        }
    }
}

/// Tunables for a [`Dispatcher`](crate::event::Dispatcher).
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// tie_break = "registration"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Initial capacity of the event registry and per-event tables, at most
    /// [`MAX_INITIAL_CAPACITY`]
    pub event_capacity: usize,
    /// Initial capacity of the listener registry, at most [`MAX_INITIAL_CAPACITY`]
    pub listener_capacity: usize,
    /// Ordering among listeners with equal priority
    pub tie_break: TieBreak,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            event_capacity: 10,
            listener_capacity: 20,
            tie_break: TieBreak::default(),
        }
    }
}

impl DispatcherConfig {
    /// Parse a configuration from a string in the given format
    pub fn from_str_with(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(contents)
                .map_err(|e| deserialization_error(format, e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(contents)
                .map_err(|e| deserialization_error(format, e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(contents)
                .map_err(|e| deserialization_error(format, e)),
        };
        if parsed.is_err() {
            log::warn!("Could not parse {} dispatcher config", format);
        }
        let config: Self = parsed?;
        config.validate()?;
        Ok(config)
    }

    /// Reject capacities above [`MAX_INITIAL_CAPACITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_capacity("event_capacity", self.event_capacity)?;
        check_capacity("listener_capacity", self.listener_capacity)
    }

    /// Read a configuration file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading dispatcher config from {}", path.display());
        Self::from_str_with(&contents, format)
    }

    /// Serialize this configuration in the given format
    pub fn to_string_with(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| serialization_error(format, e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| serialization_error(format, e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| serialization_error(format, e)),
        }
    }
}

fn check_capacity(key: &str, value: usize) -> Result<(), ConfigError> {
    if value > MAX_INITIAL_CAPACITY {
        log::warn!("Rejected {} of {}", key, value);
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("{} exceeds the maximum of {}", value, MAX_INITIAL_CAPACITY),
        });
    }
    Ok(())
}

fn deserialization_error<E>(format: ConfigFormat, source: E) -> ConfigError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConfigError::Deserialization {
        format: format.to_string(),
        source: Box::new(source),
    }
}

fn serialization_error<E>(format: ConfigFormat, source: E) -> ConfigError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConfigError::Serialization {
        format: format.to_string(),
        source: Box::new(source),
    }
}
