//! Error types for the learning core.

use thiserror::Error;
use types::StateKey;

/// Result type for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

/// Errors raised by persistence and configuration.
///
/// None of these are fatal once the service is running: the in-memory table
/// stays authoritative when a save or load fails.
#[derive(Debug, Error)]
pub enum LearningError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("non-finite value in state {0}")]
    NonFiniteValue(StateKey),
}
