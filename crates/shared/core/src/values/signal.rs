use serde::{Deserialize, Serialize};

/// Classification of one sample by a streaming detector
///
/// Serialises as the integers `-1`, `0` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    /// Sample fell below the rolling mean by more than the threshold
    Negative,
    /// No anomaly
    #[default]
    Neutral,
    /// Sample rose above the rolling mean by more than the threshold
    Positive,
}

impl Signal {
    /// Numeric form: -1, 0 or +1
    #[inline]
    pub fn as_i8(&self) -> i8 {
        match self {
            Signal::Negative => -1,
            Signal::Neutral => 0,
            Signal::Positive => 1,
        }
    }

    /// True for `Positive` and `Negative`
    #[inline]
    pub fn is_anomaly(&self) -> bool {
        *self != Signal::Neutral
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Negative),
            0 => Ok(Signal::Neutral),
            1 => Ok(Signal::Positive),
            other => Err(format!("signal must be -1, 0 or 1, got {}", other)),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Negative => write!(f, "-1"),
            Signal::Neutral => write!(f, "0"),
            Signal::Positive => write!(f, "+1"),
        }
    }
}
