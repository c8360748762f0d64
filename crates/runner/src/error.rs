//! Error types for the runner crate

use sonance_ports::DetectionError;
use thiserror::Error;

/// Frame analysis errors
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RunnerError {
    fn from(e: serde_json::Error) -> Self {
        RunnerError::Config(e.to_string())
    }
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
