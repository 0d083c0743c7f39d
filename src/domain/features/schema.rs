//! Versioned feature schema binding engineer output to model input.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::symptoms::{RedFlag, SymptomCategory};

pub const SYMPTOM_COUNT: &str = "symptom_count";
pub const NORMALIZED_SEVERITY: &str = "normalized_severity";
pub const RED_FLAG_COUNT: &str = "red_flag_count";
pub const RED_FLAG_ANY: &str = "red_flag_any";
pub const DURATION_DAYS: &str = "duration_days";
pub const DURATION_NORMALIZED: &str = "duration_normalized";
pub const PATTERN_ENCODED: &str = "pattern_encoded";
pub const AGE: &str = "age";
pub const AGE_NORMALIZED: &str = "age_normalized";
pub const SEX_MALE: &str = "sex_male";
pub const SEX_FEMALE: &str = "sex_female";

const RED_FLAG_PREFIX: &str = "red_flag_";
const CATEGORY_PREFIX: &str = "symptom_";

/// Version of the feature layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    pub const V1: Self = Self(1);

    /// Version produced by default.
    pub const CURRENT: Self = Self::V1;

    pub fn new(version: u32) -> Self {
        Self(version)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The feature vector shape a model artifact expects does not match what the
/// feature engineer produces. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaMismatchError {
    #[error("feature schema {requested} is not supported")]
    UnsupportedVersion { requested: SchemaVersion },

    #[error("schema version mismatch: model expects {expected}, got {actual}")]
    VersionMismatch {
        expected: SchemaVersion,
        actual: SchemaVersion,
    },

    #[error("feature vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("feature name mismatch at position {position}: expected '{expected}', got '{actual}'")]
    FeatureNameMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("model parameter '{parameter}' has {actual} entries, expected {expected}")]
    ParameterLength {
        parameter: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed model artifact: {reason}")]
    MalformedArtifact { reason: String },
}

impl SchemaMismatchError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            reason: reason.into(),
        }
    }
}

/// Ordered list of feature names for one schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    version: SchemaVersion,
    fields: Vec<String>,
}

static SCHEMA_V1: Lazy<FeatureSchema> = Lazy::new(FeatureSchema::build_v1);

impl FeatureSchema {
    /// Looks up a known schema.
    pub fn for_version(version: SchemaVersion) -> Result<&'static FeatureSchema, SchemaMismatchError> {
        match version {
            SchemaVersion::V1 => Ok(&SCHEMA_V1),
            requested => Err(SchemaMismatchError::UnsupportedVersion { requested }),
        }
    }

    pub fn v1() -> &'static FeatureSchema {
        &SCHEMA_V1
    }

    fn build_v1() -> Self {
        let mut fields: Vec<String> = vec![
            SYMPTOM_COUNT.to_string(),
            NORMALIZED_SEVERITY.to_string(),
            RED_FLAG_COUNT.to_string(),
            RED_FLAG_ANY.to_string(),
        ];
        fields.extend(RedFlag::all().iter().map(|flag| red_flag_field(*flag)));
        fields.extend(
            [
                DURATION_DAYS,
                DURATION_NORMALIZED,
                PATTERN_ENCODED,
                AGE,
                AGE_NORMALIZED,
                SEX_MALE,
                SEX_FEMALE,
            ]
            .iter()
            .map(|name| name.to_string()),
        );
        fields.extend(SymptomCategory::all().iter().map(|c| category_field(*c)));

        Self {
            version: SchemaVersion::V1,
            fields,
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Verifies that a model's declared feature names match this schema exactly.
    pub fn check_names<S: AsRef<str>>(&self, names: &[S]) -> Result<(), SchemaMismatchError> {
        if names.len() != self.fields.len() {
            return Err(SchemaMismatchError::LengthMismatch {
                expected: self.fields.len(),
                actual: names.len(),
            });
        }
        for (position, (expected, actual)) in self.fields.iter().zip(names).enumerate() {
            if expected != actual.as_ref() {
                return Err(SchemaMismatchError::FeatureNameMismatch {
                    position,
                    expected: expected.clone(),
                    actual: actual.as_ref().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Feature name of a red flag indicator.
pub fn red_flag_field(flag: RedFlag) -> String {
    format!("{}{}", RED_FLAG_PREFIX, flag.as_str())
}

/// Feature name of a category indicator.
pub fn category_field(category: SymptomCategory) -> String {
    format!("{}{}", CATEGORY_PREFIX, category.as_str())
}

/// Returns the red flag an indicator field encodes, if it is one.
pub fn red_flag_for_field(name: &str) -> Option<RedFlag> {
    name.strip_prefix(RED_FLAG_PREFIX)
        .and_then(RedFlag::from_identifier)
}
