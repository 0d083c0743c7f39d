//! Risk score value object (probability on the 0-1 scale).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The risk model produced something that is not a probability.
///
/// Always fatal: a score is never clamped into range, since that would hide
/// a corrupt model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidScoreError {
    #[error("risk score is not a finite number ({raw})")]
    NotFinite { raw: f64 },

    #[error("risk score {raw} is outside [0, 1]")]
    OutOfRange { raw: f64 },
}

impl InvalidScoreError {
    /// The rejected raw value.
    pub fn raw(&self) -> f64 {
        match self {
            Self::NotFinite { raw } | Self::OutOfRange { raw } => *raw,
        }
    }
}

/// A probability in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RiskScore(f64);

impl RiskScore {
    pub const MIN: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    /// Validates a raw model output.
    pub fn try_new(raw: f64) -> Result<Self, InvalidScoreError> {
        if !raw.is_finite() {
            return Err(InvalidScoreError::NotFinite { raw });
        }
        if !(0.0..=1.0).contains(&raw) {
            return Err(InvalidScoreError::OutOfRange { raw });
        }
        Ok(Self(raw))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Score on the 0-100 scale, rounded to one decimal.
    pub fn as_percent(&self) -> f64 {
        (self.0 * 1000.0).round() / 10.0
    }
}

impl TryFrom<f64> for RiskScore {
    type Error = InvalidScoreError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        Self::try_new(raw)
    }
}

impl From<RiskScore> for f64 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_closed_unit_interval() {
        assert_eq!(RiskScore::try_new(0.0).unwrap().value(), 0.0);
        assert_eq!(RiskScore::try_new(0.4).unwrap().value(), 0.4);
        assert_eq!(RiskScore::try_new(1.0).unwrap().value(), 1.0);
    }

    #[test]
    fn rejects_out_of_range_without_clamping() {
        assert_eq!(
            RiskScore::try_new(1.2),
            Err(InvalidScoreError::OutOfRange { raw: 1.2 })
        );
        assert_eq!(
            RiskScore::try_new(-0.01),
            Err(InvalidScoreError::OutOfRange { raw: -0.01 })
        );
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(matches!(
            RiskScore::try_new(f64::NAN),
            Err(InvalidScoreError::NotFinite { .. })
        ));
        assert!(matches!(
            RiskScore::try_new(f64::INFINITY),
            Err(InvalidScoreError::NotFinite { .. })
        ));
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(RiskScore::try_new(0.8765).unwrap().as_percent(), 87.7);
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<RiskScore>("0.5").is_ok());
        assert!(serde_json::from_str::<RiskScore>("1.5").is_err());
    }
}
