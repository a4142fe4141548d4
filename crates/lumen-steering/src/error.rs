//! Error types for the steering crate.

use lumen_common::ConfigError;
use thiserror::Error;

/// Errors that can occur when scheduling or configuring steering.
#[derive(Debug, Error)]
pub enum SteeringError {
    /// Another action already holds this priority
    #[error("priority {priority} already taken by action '{existing}' (rejected '{rejected}')")]
    DuplicatePriority {
        /// Contested priority
        priority: i32,
        /// Id of the scheduled action
        existing: String,
        /// Id of the rejected action
        rejected: String,
    },

    /// No scheduled action has this id
    #[error("no scheduled action with id '{0}'")]
    UnknownAction(String),

    /// Configuration could not be loaded or saved
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for steering operations.
pub type SteeringResult<T> = Result<T, SteeringError>;
