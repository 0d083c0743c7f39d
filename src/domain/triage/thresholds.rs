//! Score band boundaries.

use serde::{Deserialize, Serialize};

use super::label::TriageLabel;
use crate::domain::foundation::ValidationError;
use crate::domain::risk::RiskScore;

pub const DEFAULT_URGENT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_CONSULT_THRESHOLD: f64 = 0.4;

/// Lower bounds of the urgent and consult bands. Each bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriageThresholds {
    urgent: f64,
    consult: f64,
}

impl TriageThresholds {
    /// Creates validated thresholds; requires `0 <= consult < urgent <= 1`.
    pub fn new(urgent: f64, consult: f64) -> Result<Self, ValidationError> {
        let thresholds = Self { urgent, consult };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("urgent_threshold", self.urgent), ("consult_threshold", self.consult)] {
            if !value.is_finite() {
                return Err(ValidationError::not_finite(field));
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::out_of_range(field, 0.0, 1.0, value));
            }
        }
        if self.consult >= self.urgent {
            return Err(ValidationError::invalid_format(
                "consult_threshold",
                format!(
                    "must be below the urgent threshold ({} >= {})",
                    self.consult, self.urgent
                ),
            ));
        }
        Ok(())
    }

    pub fn urgent(&self) -> f64 {
        self.urgent
    }

    pub fn consult(&self) -> f64 {
        self.consult
    }

    /// Bands a validated score.
    pub fn band(&self, score: RiskScore) -> TriageLabel {
        let s = score.value();
        if s >= self.urgent {
            TriageLabel::Urgent
        } else if s >= self.consult {
            TriageLabel::Consult
        } else {
            TriageLabel::SelfCare
        }
    }

    /// Distance from `score` to the nearest band boundary.
    pub fn margin(&self, score: RiskScore) -> f64 {
        let s = score.value();
        (s - self.urgent).abs().min((s - self.consult).abs())
    }
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            urgent: DEFAULT_URGENT_THRESHOLD,
            consult: DEFAULT_CONSULT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(s: f64) -> RiskScore {
        RiskScore::try_new(s).unwrap()
    }

    #[test]
    fn lower_bounds_are_inclusive() {
        let t = TriageThresholds::default();
        assert_eq!(t.band(score(0.8)), TriageLabel::Urgent);
        assert_eq!(t.band(score(0.79)), TriageLabel::Consult);
        assert_eq!(t.band(score(0.4)), TriageLabel::Consult);
        assert_eq!(t.band(score(0.39)), TriageLabel::SelfCare);
    }

    #[test]
    fn extremes_band_correctly() {
        let t = TriageThresholds::default();
        assert_eq!(t.band(score(0.0)), TriageLabel::SelfCare);
        assert_eq!(t.band(score(1.0)), TriageLabel::Urgent);
    }

    #[test]
    fn margin_is_distance_to_nearest_boundary() {
        let t = TriageThresholds::default();
        assert!((t.margin(score(0.75)) - 0.05).abs() < 1e-12);
        assert!((t.margin(score(0.1)) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        assert!(TriageThresholds::new(0.4, 0.8).is_err());
        assert!(TriageThresholds::new(0.5, 0.5).is_err());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        assert!(matches!(
            TriageThresholds::new(1.2, 0.4),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            TriageThresholds::new(0.8, f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let t = TriageThresholds::new(0.9, 0.2).unwrap();
        assert_eq!(t.band(score(0.85)), TriageLabel::Consult);
        assert_eq!(t.band(score(0.2)), TriageLabel::Consult);
    }
}
