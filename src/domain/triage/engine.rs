//! Triage Decision Engine - risk score → triage label.
//!
//! Classification, not a state machine that evolves: three terminal bands
//! plus the safety override. The override is evaluated before the threshold
//! lookup, so no score can talk a patient with an always-urgent red flag
//! down from `urgent`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use super::label::TriageLabel;
use super::thresholds::TriageThresholds;
use crate::domain::risk::{InvalidScoreError, RiskScore};
use crate::domain::symptoms::{RedFlag, StructuredSymptomRecord};

/// Scores within this distance of a band boundary are flagged borderline.
pub const BORDERLINE_MARGIN: f64 = 0.05;

/// Why a label was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionBasis {
    Threshold,
    SafetyOverride { flags: Vec<RedFlag> },
}

impl DecisionBasis {
    pub fn is_override(&self) -> bool {
        matches!(self, DecisionBasis::SafetyOverride { .. })
    }
}

/// Result of deciding one score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub label: TriageLabel,
    pub score: RiskScore,
    pub basis: DecisionBasis,
    /// Distance from the score to the nearest band boundary.
    pub margin: f64,
}

impl TriageOutcome {
    /// True when a small change in score would have changed the band.
    pub fn is_borderline(&self) -> bool {
        !self.basis.is_override() && self.margin < BORDERLINE_MARGIN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriageEngine {
    thresholds: TriageThresholds,
    always_urgent: BTreeSet<RedFlag>,
}

impl TriageEngine {
    pub fn new(thresholds: TriageThresholds, always_urgent: impl IntoIterator<Item = RedFlag>) -> Self {
        Self {
            thresholds,
            always_urgent: always_urgent.into_iter().collect(),
        }
    }

    pub fn thresholds(&self) -> &TriageThresholds {
        &self.thresholds
    }

    pub fn always_urgent(&self) -> &BTreeSet<RedFlag> {
        &self.always_urgent
    }

    /// Bands a raw model output. Depends on the score alone.
    pub fn classify(&self, raw: f64) -> Result<TriageLabel, InvalidScoreError> {
        let score = RiskScore::try_new(raw)?;
        Ok(self.thresholds.band(score))
    }

    /// Decides a validated score for a record, applying the safety override.
    pub fn decide(&self, score: RiskScore, record: &StructuredSymptomRecord) -> TriageOutcome {
        let margin = self.thresholds.margin(score);
        let triggered: Vec<RedFlag> = record
            .red_flags()
            .intersection(&self.always_urgent)
            .copied()
            .collect();

        let outcome = if triggered.is_empty() {
            TriageOutcome {
                label: self.thresholds.band(score),
                score,
                basis: DecisionBasis::Threshold,
                margin,
            }
        } else {
            TriageOutcome {
                label: TriageLabel::Urgent,
                score,
                basis: DecisionBasis::SafetyOverride { flags: triggered },
                margin,
            }
        };

        info!(
            label = %outcome.label,
            score = score.value(),
            override_applied = outcome.basis.is_override(),
            borderline = outcome.is_borderline(),
            "triage decided"
        );
        outcome
    }

    /// Validates a raw score, then decides. Invalid scores fail even when
    /// the override would apply.
    pub fn decide_raw(
        &self,
        raw: f64,
        record: &StructuredSymptomRecord,
    ) -> Result<TriageOutcome, InvalidScoreError> {
        let score = RiskScore::try_new(raw)?;
        Ok(self.decide(score, record))
    }
}

impl Default for TriageEngine {
    fn default() -> Self {
        Self::new(
            TriageThresholds::default(),
            RedFlag::default_always_urgent().iter().copied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(s: f64) -> RiskScore {
        RiskScore::try_new(s).unwrap()
    }

    #[test]
    fn classify_boundaries_are_exact() {
        let engine = TriageEngine::default();
        assert_eq!(engine.classify(0.79).unwrap(), TriageLabel::Consult);
        assert_eq!(engine.classify(0.8).unwrap(), TriageLabel::Urgent);
        assert_eq!(engine.classify(0.39).unwrap(), TriageLabel::SelfCare);
        assert_eq!(engine.classify(0.4).unwrap(), TriageLabel::Consult);
    }

    #[test]
    fn classify_rejects_invalid_scores() {
        let engine = TriageEngine::default();
        assert!(engine.classify(1.01).is_err());
        assert!(engine.classify(-0.2).is_err());
        assert!(engine.classify(f64::NAN).is_err());
    }

    #[test]
    fn override_forces_urgent_at_low_score() {
        let engine = TriageEngine::default();
        let record = StructuredSymptomRecord::new(2.0).with_red_flag(RedFlag::SevereChestPain);
        let outcome = engine.decide(score(0.01), &record);

        assert_eq!(outcome.label, TriageLabel::Urgent);
        assert_eq!(
            outcome.basis,
            DecisionBasis::SafetyOverride {
                flags: vec![RedFlag::SevereChestPain]
            }
        );
        assert!(!outcome.is_borderline());
    }

    #[test]
    fn non_override_flags_do_not_force_urgent() {
        let engine = TriageEngine::default();
        let record = StructuredSymptomRecord::new(2.0).with_red_flag(RedFlag::Fracture);
        let outcome = engine.decide(score(0.2), &record);

        assert_eq!(outcome.label, TriageLabel::SelfCare);
        assert_eq!(outcome.basis, DecisionBasis::Threshold);
    }

    #[test]
    fn override_set_is_configurable() {
        let engine = TriageEngine::new(TriageThresholds::default(), [RedFlag::Fracture]);
        let record = StructuredSymptomRecord::new(2.0).with_red_flag(RedFlag::Fracture);
        assert_eq!(engine.decide(score(0.1), &record).label, TriageLabel::Urgent);

        let record = StructuredSymptomRecord::new(2.0).with_red_flag(RedFlag::SevereChestPain);
        assert_eq!(engine.decide(score(0.1), &record).label, TriageLabel::SelfCare);
    }

    #[test]
    fn decide_raw_validates_before_override() {
        let engine = TriageEngine::default();
        let record = StructuredSymptomRecord::new(9.0).with_red_flag(RedFlag::ActiveBleeding);
        assert!(engine.decide_raw(f64::NAN, &record).is_err());
        assert!(engine.decide_raw(1.5, &record).is_err());
    }

    #[test]
    fn borderline_scores_are_flagged() {
        let engine = TriageEngine::default();
        let record = StructuredSymptomRecord::new(5.0);
        assert!(engine.decide(score(0.78), &record).is_borderline());
        assert!(!engine.decide(score(0.6), &record).is_borderline());
    }

    proptest! {
        #[test]
        fn always_urgent_flag_wins_for_any_score(
            s in 0.0f64..=1.0,
            flag_index in 0usize..5,
        ) {
            let engine = TriageEngine::default();
            let flag = RedFlag::default_always_urgent()[flag_index];
            let record = StructuredSymptomRecord::new(0.0).with_red_flag(flag);
            prop_assert_eq!(engine.decide(score(s), &record).label, TriageLabel::Urgent);
        }

        #[test]
        fn banding_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let engine = TriageEngine::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo_rank = engine.classify(lo).unwrap().severity_rank();
            let hi_rank = engine.classify(hi).unwrap().severity_rank();
            prop_assert!(lo_rank <= hi_rank);
        }

        #[test]
        fn decide_without_flags_matches_classify(s in 0.0f64..=1.0) {
            let engine = TriageEngine::default();
            let record = StructuredSymptomRecord::new(5.0);
            prop_assert_eq!(engine.decide(score(s), &record).label, engine.classify(s).unwrap());
        }
    }
}
