//! Configuration error types.

use shipview_types::UnknownCategory;

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A duration option is negative, NaN or infinite.
    #[error("invalid duration for '{field}': {value} (expected a non-negative number of seconds)")]
    InvalidDuration { field: String, value: f64 },

    /// A TTL was given for a category that does not exist.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
}
