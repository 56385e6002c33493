use std::result::Result as StdResult;

use thiserror::Error;

use crate::config::ConfigError;

/// Error type shared by the codecs, storage layer and tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Format error: {0}")]
    Format(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, TrackerError>;

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<ConfigError> for TrackerError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => TrackerError::Storage(io.to_string()),
            ConfigError::Serde(message) => TrackerError::Config(message),
        }
    }
}
