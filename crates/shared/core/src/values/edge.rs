use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// How flat-topped plateaus are treated by peak detection
///
/// `Rising` reports the first sample of a plateau, `Falling` the last,
/// `Both` reports both, and `None` ignores plateaus entirely (strict
/// local maxima only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    #[default]
    Rising,
    Falling,
    Both,
    None,
}

impl EdgePolicy {
    /// Contributes the first sample of a plateau
    #[inline]
    pub fn keeps_rising(&self) -> bool {
        matches!(self, EdgePolicy::Rising | EdgePolicy::Both)
    }

    /// Contributes the last sample of a plateau
    #[inline]
    pub fn keeps_falling(&self) -> bool {
        matches!(self, EdgePolicy::Falling | EdgePolicy::Both)
    }
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgePolicy::Rising => write!(f, "rising"),
            EdgePolicy::Falling => write!(f, "falling"),
            EdgePolicy::Both => write!(f, "both"),
            EdgePolicy::None => write!(f, "none"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown edge policy: {0} (expected rising, falling, both or none)")]
pub struct ParseEdgePolicyError(pub String);

impl FromStr for EdgePolicy {
    type Err = ParseEdgePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rising" => Ok(EdgePolicy::Rising),
            "falling" => Ok(EdgePolicy::Falling),
            "both" => Ok(EdgePolicy::Both),
            "none" | "null" => Ok(EdgePolicy::None),
            _ => Err(ParseEdgePolicyError(s.to_string())),
        }
    }
}
