//! Error types for gameplay systems.

use lumen_common::ConfigError;
use thiserror::Error;

/// Errors that can occur in gameplay systems.
#[derive(Debug, Error)]
pub enum GameplayError {
    /// Configuration could not be loaded or saved
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for gameplay operations.
pub type GameplayResult<T> = Result<T, GameplayError>;
