//! Layered spectrum scorer.
//!
//! A rule-based classifier over the v1 vector. Four layers each map one
//! aspect of the record onto `[0, 1]`:
//!
//! - injuries: trauma category and injury red flags
//! - severity: an exponential curve over the 0-10 rating
//! - red flags: critical and severe flags plus how many are present
//! - combinations: dangerous category pairs and category breadth
//!
//! A single alarming layer dominates; otherwise the layers are blended so
//! several moderate layers reinforce each other. Output never exceeds
//! `SPECTRUM_CEILING`.

use serde::{Deserialize, Serialize};

use crate::domain::features::{
    category_field, red_flag_field, FeatureSchema, SchemaMismatchError, SchemaVersion,
    NORMALIZED_SEVERITY, RED_FLAG_COUNT, SYMPTOM_COUNT,
};
use crate::domain::symptoms::{RedFlag, SymptomCategory, MAX_SEVERITY};

/// Highest score the spectrum ever produces.
pub const SPECTRUM_CEILING: f64 = 0.95;

/// Blend weights of the injury, severity, red flag and combination layers.
const LAYER_WEIGHTS: [f64; 4] = [0.28, 0.22, 0.12, 0.08];

const SEVERE_FLAGS: [RedFlag; 4] = [
    RedFlag::Fracture,
    RedFlag::Dislocation,
    RedFlag::TraumaticInjury,
    RedFlag::MultipleInjuries,
];

/// Header-only artifact; the layer rules are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumArtifact {
    pub model_id: String,
    pub model_version: String,
    pub schema_version: SchemaVersion,
    pub feature_names: Vec<String>,
}

impl SpectrumArtifact {
    /// Artifact bound to every field of `schema`.
    pub fn for_schema(model_id: impl Into<String>, schema: &FeatureSchema) -> Self {
        Self {
            model_id: model_id.into(),
            model_version: "1.0.0".to_string(),
            schema_version: schema.version(),
            feature_names: schema.fields().to_vec(),
        }
    }
}

/// Per-layer scores for one vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumLayers {
    pub injury: f64,
    pub severity: f64,
    pub red_flags: f64,
    pub combination: f64,
}

impl SpectrumLayers {
    fn as_array(&self) -> [f64; 4] {
        [self.injury, self.severity, self.red_flags, self.combination]
    }

    /// Blends the layers into one probability.
    pub fn combine(&self) -> f64 {
        if self.injury >= 0.80 {
            let mut base = self.injury;
            if self.severity > 0.5 {
                base = base.max(self.severity * 0.9);
            }
            if self.red_flags > 0.5 {
                base = base.max(self.red_flags * 0.85);
            }
            return base.min(SPECTRUM_CEILING);
        }

        if self.severity >= 0.70 {
            let mut base = self.severity;
            if self.red_flags > 0.4 {
                base = base * 0.65 + self.red_flags * 0.35;
            }
            if self.combination > 0.3 {
                base = base.max(self.combination * 0.75);
            }
            return base.min(0.92);
        }

        let layers = self.as_array();
        let weighted: f64 = layers.iter().zip(LAYER_WEIGHTS).map(|(l, w)| l * w).sum();
        let max_layer = layers.iter().copied().fold(0.0, f64::max);
        let active = layers.iter().filter(|l| **l > 0.05).count();

        let combined = if max_layer >= 0.60 {
            if active >= 3 {
                weighted * 0.55 + max_layer * 0.45
            } else {
                weighted * 0.6 + max_layer * 0.4
            }
        } else if max_layer >= 0.40 {
            if active >= 2 {
                weighted * 0.65 + max_layer * 0.35
            } else {
                weighted * 0.7 + max_layer * 0.3
            }
        } else {
            weighted
        };
        combined.min(SPECTRUM_CEILING)
    }
}

/// Maps a 0-10 severity onto the spectrum curve.
pub fn severity_curve(severity: f64) -> f64 {
    if severity >= MAX_SEVERITY {
        return SPECTRUM_CEILING;
    }
    if severity <= 0.0 {
        return 0.08;
    }
    let normalized = severity / MAX_SEVERITY;
    (0.08 + normalized.powf(1.8) * 0.87).min(SPECTRUM_CEILING)
}

/// Vector positions the layers read, resolved once at load.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumLayout {
    symptom_count: usize,
    severity: usize,
    red_flag_count: usize,
    flags: Vec<(RedFlag, usize)>,
    chest_pain: usize,
    shortness_of_breath: usize,
    trauma: usize,
}

fn position(schema: &FeatureSchema, name: &str) -> Result<usize, SchemaMismatchError> {
    schema
        .index_of(name)
        .ok_or_else(|| SchemaMismatchError::malformed(format!("spectrum needs feature {}", name)))
}

impl SpectrumLayout {
    pub fn resolve(schema: &FeatureSchema) -> Result<Self, SchemaMismatchError> {
        let flags = RedFlag::all()
            .iter()
            .map(|flag| Ok((*flag, position(schema, &red_flag_field(*flag))?)))
            .collect::<Result<Vec<_>, SchemaMismatchError>>()?;

        Ok(Self {
            symptom_count: position(schema, SYMPTOM_COUNT)?,
            severity: position(schema, NORMALIZED_SEVERITY)?,
            red_flag_count: position(schema, RED_FLAG_COUNT)?,
            flags,
            chest_pain: position(schema, &category_field(SymptomCategory::ChestPain))?,
            shortness_of_breath: position(
                schema,
                &category_field(SymptomCategory::ShortnessOfBreath),
            )?,
            trauma: position(schema, &category_field(SymptomCategory::Trauma))?,
        })
    }

    fn has_flag(&self, x: &[f64], flag: RedFlag) -> bool {
        self.flags
            .iter()
            .any(|(f, i)| *f == flag && x[*i] > 0.0)
    }

    fn injury(&self, x: &[f64]) -> f64 {
        let mut risk: f64 = 0.0;
        if x[self.trauma] > 0.0 {
            risk = risk.max(0.73);
        }
        for (flag, floor) in [
            (RedFlag::Fracture, 0.72),
            (RedFlag::TraumaticInjury, 0.75),
            (RedFlag::Dislocation, 0.78),
            (RedFlag::MultipleInjuries, 0.87),
        ] {
            if self.has_flag(x, flag) {
                risk = risk.max(floor);
            }
        }
        risk
    }

    fn red_flags(&self, x: &[f64]) -> f64 {
        let count = x[self.red_flag_count];
        if count <= 0.0 {
            return 0.0;
        }
        let mut risk: f64 = 0.0;
        if RedFlag::default_always_urgent()
            .iter()
            .any(|flag| self.has_flag(x, *flag))
        {
            risk = risk.max(0.85);
        }
        if SEVERE_FLAGS.iter().any(|flag| self.has_flag(x, *flag)) {
            risk = risk.max(0.68);
        }
        let by_count = if count >= 3.0 {
            0.90
        } else if count >= 2.0 {
            0.75
        } else {
            0.55
        };
        risk.max(by_count)
    }

    fn combination(&self, x: &[f64]) -> f64 {
        let count = x[self.symptom_count];
        let trauma = x[self.trauma] > 0.0;

        if x[self.chest_pain] > 0.0 && x[self.shortness_of_breath] > 0.0 {
            0.90
        } else if trauma && count >= 4.0 {
            0.85
        } else if trauma && count >= 3.0 {
            0.75
        } else if count >= 5.0 {
            0.65
        } else if count >= 4.0 {
            0.55
        } else if count >= 3.0 {
            0.42
        } else if count >= 2.0 {
            0.30
        } else {
            0.18
        }
    }

    pub fn layers(&self, x: &[f64]) -> SpectrumLayers {
        SpectrumLayers {
            injury: self.injury(x),
            severity: severity_curve(x[self.severity] * MAX_SEVERITY),
            red_flags: self.red_flags(x),
            combination: self.combination(x),
        }
    }

    /// Weighted share of the layers each present feature feeds.
    pub fn attribution(&self, x: &[f64]) -> Vec<f64> {
        let layers = self.layers(x);
        let [injury, severity, red_flags, combination] = LAYER_WEIGHTS;
        let mut shares = vec![0.0; x.len()];

        shares[self.severity] = severity * layers.severity;
        for (flag, i) in &self.flags {
            if x[*i] > 0.0 {
                shares[*i] = red_flags * layers.red_flags;
                if SEVERE_FLAGS.contains(flag) {
                    shares[*i] += injury * layers.injury;
                }
            }
        }
        for i in [self.chest_pain, self.shortness_of_breath, self.trauma] {
            if x[i] > 0.0 {
                shares[i] = combination * layers.combination;
            }
        }
        if x[self.trauma] > 0.0 {
            shares[self.trauma] += injury * layers.injury;
        }
        shares
    }
}
