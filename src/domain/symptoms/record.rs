//! StructuredSymptomRecord - the data contract produced by the symptom parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{RedFlag, SymptomCategory, SymptomDuration, SymptomPattern};
use crate::domain::foundation::ValidationError;

/// Lowest accepted severity.
pub const MIN_SEVERITY: f64 = 0.0;

/// Highest accepted severity.
pub const MAX_SEVERITY: f64 = 10.0;

/// How much the parser trusted its own output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseConfidence {
    #[default]
    Parsed,
    LowConfidence,
}

/// Structured view of one symptom report.
///
/// Built once per report and never mutated afterwards; the `with_*` methods
/// consume the record and return a new one. Severity is carried raw and is
/// range-checked by [`StructuredSymptomRecord::validate`], which the feature
/// engineer calls before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire", into = "RecordWire")]
pub struct StructuredSymptomRecord {
    categories: BTreeSet<SymptomCategory>,
    severity: f64,
    duration: SymptomDuration,
    pattern: SymptomPattern,
    red_flags: BTreeSet<RedFlag>,
    confidence: ParseConfidence,
}

impl StructuredSymptomRecord {
    /// Creates a record with the given severity and nothing else reported.
    pub fn new(severity: f64) -> Self {
        Self {
            categories: BTreeSet::new(),
            severity,
            duration: SymptomDuration::unknown(),
            pattern: SymptomPattern::default(),
            red_flags: BTreeSet::new(),
            confidence: ParseConfidence::Parsed,
        }
    }

    /// The record used when parsing failed or the text was unusable:
    /// no categories, severity 0, no flags.
    pub fn low_confidence() -> Self {
        Self {
            confidence: ParseConfidence::LowConfidence,
            ..Self::new(MIN_SEVERITY)
        }
    }

    pub fn with_category(mut self, category: SymptomCategory) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = SymptomCategory>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn with_red_flag(mut self, flag: RedFlag) -> Self {
        self.red_flags.insert(flag);
        self
    }

    pub fn with_red_flags(mut self, flags: impl IntoIterator<Item = RedFlag>) -> Self {
        self.red_flags.extend(flags);
        self
    }

    pub fn with_pattern(mut self, pattern: SymptomPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_duration(mut self, duration: SymptomDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Replaces the raw severity. Range is checked by `validate`.
    pub fn with_severity(mut self, severity: f64) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_confidence(mut self, confidence: ParseConfidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn categories(&self) -> &BTreeSet<SymptomCategory> {
        &self.categories
    }

    pub fn severity(&self) -> f64 {
        self.severity
    }

    pub fn duration(&self) -> &SymptomDuration {
        &self.duration
    }

    pub fn pattern(&self) -> SymptomPattern {
        self.pattern
    }

    pub fn red_flags(&self) -> &BTreeSet<RedFlag> {
        &self.red_flags
    }

    pub fn confidence(&self) -> ParseConfidence {
        self.confidence
    }

    pub fn has_red_flag(&self, flag: RedFlag) -> bool {
        self.red_flags.contains(&flag)
    }

    /// Checks that severity is a finite number in `[0, 10]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.severity.is_finite() {
            return Err(ValidationError::not_finite("severity"));
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.severity) {
            return Err(ValidationError::out_of_range(
                "severity",
                MIN_SEVERITY,
                MAX_SEVERITY,
                self.severity,
            ));
        }
        Ok(())
    }
}

/// Wire shape emitted by the language-model parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordWire {
    #[serde(default, alias = "categories")]
    symptom_categories: Vec<SymptomCategory>,
    #[serde(default)]
    severity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
    #[serde(default)]
    pattern: SymptomPattern,
    #[serde(default)]
    red_flags: Vec<RedFlag>,
    #[serde(default)]
    confidence: ParseConfidence,
}

impl TryFrom<RecordWire> for StructuredSymptomRecord {
    type Error = ValidationError;

    fn try_from(wire: RecordWire) -> Result<Self, Self::Error> {
        let described = match wire.duration {
            Some(text) => SymptomDuration::describe(text)?,
            None => SymptomDuration::unknown(),
        };
        let duration = match wire.duration_days {
            Some(days) => described.with_days(days),
            None => described,
        };

        Ok(Self::new(wire.severity.unwrap_or(MIN_SEVERITY))
            .with_categories(wire.symptom_categories)
            .with_red_flags(wire.red_flags)
            .with_pattern(wire.pattern)
            .with_duration(duration)
            .with_confidence(wire.confidence))
    }
}

impl From<StructuredSymptomRecord> for RecordWire {
    fn from(record: StructuredSymptomRecord) -> Self {
        Self {
            symptom_categories: record.categories.into_iter().collect(),
            severity: Some(record.severity),
            duration_days: record.duration.days(),
            duration: record.duration.description().map(str::to_string),
            pattern: record.pattern,
            red_flags: record.red_flags.into_iter().collect(),
            confidence: record.confidence,
        }
    }
}
