//! Triage decision configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::explanation::DEFAULT_TOP_K;
use crate::domain::symptoms::RedFlag;
use crate::domain::triage::{
    TriageEngine, TriageThresholds, DEFAULT_CONSULT_THRESHOLD, DEFAULT_URGENT_THRESHOLD,
};

/// Thresholds, safety override set and explanation size.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TriageConfig {
    /// Lowest score labelled urgent
    #[serde(default = "default_urgent")]
    pub urgent_threshold: f64,

    /// Lowest score labelled consult
    #[serde(default = "default_consult")]
    pub consult_threshold: f64,

    /// Red flag identifiers that force an urgent label
    #[serde(default = "default_always_urgent")]
    pub always_urgent: Vec<String>,

    /// Contributing factors surfaced per decision
    #[serde(default = "default_top_k")]
    pub explanation_top_k: usize,
}

impl TriageConfig {
    pub fn thresholds(&self) -> Result<TriageThresholds, ValidationError> {
        TriageThresholds::new(self.urgent_threshold, self.consult_threshold)
            .map_err(|e| ValidationError::InvalidThresholds(e.to_string()))
    }

    /// Resolves `always_urgent` against the red flag vocabulary. Unknown
    /// identifiers are rejected rather than bucketed into `other`.
    pub fn always_urgent_flags(&self) -> Result<Vec<RedFlag>, ValidationError> {
        self.always_urgent
            .iter()
            .map(|raw| {
                RedFlag::from_identifier(raw)
                    .ok_or_else(|| ValidationError::UnknownRedFlag(raw.clone()))
            })
            .collect()
    }

    /// Builds the decision engine this section describes.
    pub fn engine(&self) -> Result<TriageEngine, ValidationError> {
        Ok(TriageEngine::new(
            self.thresholds()?,
            self.always_urgent_flags()?,
        ))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.thresholds()?;
        self.always_urgent_flags()?;
        if self.explanation_top_k == 0 {
            return Err(ValidationError::InvalidTopK);
        }
        Ok(())
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            urgent_threshold: default_urgent(),
            consult_threshold: default_consult(),
            always_urgent: default_always_urgent(),
            explanation_top_k: default_top_k(),
        }
    }
}

fn default_urgent() -> f64 {
    DEFAULT_URGENT_THRESHOLD
}

fn default_consult() -> f64 {
    DEFAULT_CONSULT_THRESHOLD
}

fn default_always_urgent() -> Vec<String> {
    RedFlag::default_always_urgent()
        .iter()
        .map(|flag| flag.as_str().to_string())
        .collect()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TriageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.urgent_threshold, 0.8);
        assert_eq!(config.consult_threshold, 0.4);
        assert_eq!(config.explanation_top_k, 5);
    }

    #[test]
    fn test_default_engine_matches_domain_default() {
        let engine = TriageConfig::default().engine().unwrap();
        assert_eq!(engine, TriageEngine::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = TriageConfig {
            urgent_threshold: 0.3,
            consult_threshold: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let config = TriageConfig {
            always_urgent: vec!["severe_chest_pain".to_string(), "sneezing".to_string()],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownRedFlag("sneezing".to_string()))
        );
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = TriageConfig {
            explanation_top_k: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTopK));
    }

    #[test]
    fn test_override_set_accepts_spaced_identifiers() {
        let config = TriageConfig {
            always_urgent: vec!["Multiple Injuries".to_string(), "active-bleeding".to_string()],
            ..Default::default()
        };
        assert_eq!(
            config.always_urgent_flags().unwrap(),
            vec![RedFlag::MultipleInjuries, RedFlag::ActiveBleeding]
        );
    }

    #[test]
    fn test_custom_override_set() {
        let config = TriageConfig {
            always_urgent: vec!["fracture".to_string()],
            ..Default::default()
        };
        let engine = config.engine().unwrap();
        assert_eq!(engine.always_urgent().len(), 1);
        assert!(engine.always_urgent().contains(&RedFlag::Fracture));
    }
}
