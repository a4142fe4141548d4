//! Error types for Lumen.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO errors
    #[error("IO error on {}: {}", .path.display(), .source)]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML parse errors
    #[error("Failed to parse {}: {}", .path.display(), .source)]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
