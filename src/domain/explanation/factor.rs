//! Contributing factors surfaced alongside a decision.

use serde::{Deserialize, Serialize};

use crate::domain::symptoms::RedFlag;

/// What made a factor relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FactorSignal {
    /// A red flag present in the record.
    RedFlag { flag: RedFlag },
    /// A model contribution, in model units.
    Weight { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub feature: String,
    pub signal: FactorSignal,
}

impl ContributingFactor {
    pub fn red_flag(flag: RedFlag) -> Self {
        Self {
            feature: crate::domain::features::red_flag_field(flag),
            signal: FactorSignal::RedFlag { flag },
        }
    }

    pub fn weighted(feature: impl Into<String>, value: f64) -> Self {
        Self {
            feature: feature.into(),
            signal: FactorSignal::Weight { value },
        }
    }

    pub fn is_red_flag(&self) -> bool {
        matches!(self.signal, FactorSignal::RedFlag { .. })
    }
}
