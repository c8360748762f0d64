use sonance_core::ParseEdgePolicyError;
use thiserror::Error;

/// Errors raised by the detectors and the vector helpers they build on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// Malformed or out-of-range configuration or input. The caller must fix it.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Too few samples for the requested operation. The caller may accumulate
    /// more samples and retry.
    #[error("Insufficient data: need at least {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

impl DetectionError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        DetectionError::InvalidArgument(reason.into())
    }
}

impl From<ParseEdgePolicyError> for DetectionError {
    fn from(e: ParseEdgePolicyError) -> Self {
        DetectionError::InvalidArgument(e.to_string())
    }
}

pub type DetectionResult<T> = std::result::Result<T, DetectionError>;
