//! Feature Engineer - structured record + demographics → feature vector.
//!
//! A pure transform: no hidden state, no randomness, no I/O. The same inputs
//! always produce a bit-identical vector.

use tracing::debug;

use super::schema::{FeatureSchema, SchemaMismatchError, SchemaVersion};
use super::vector::FeatureVector;
use crate::domain::foundation::ValidationError;
use crate::domain::symptoms::{
    Demographics, RedFlag, Sex, StructuredSymptomRecord, SymptomCategory, MAX_SEVERITY,
};

/// Age used when the caller does not supply one.
pub const AGE_SENTINEL_YEARS: f64 = 50.0;

/// Divisor for `age_normalized`.
pub const AGE_NORMALIZER_YEARS: f64 = 100.0;

/// Divisor for `duration_normalized`.
pub const DURATION_NORMALIZER_DAYS: f64 = 30.0;

/// Encodes symptom records into vectors of one fixed schema version.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEngineer {
    schema: &'static FeatureSchema,
}

impl FeatureEngineer {
    /// Creates an engineer for a schema version. Unknown versions are a
    /// configuration error.
    pub fn new(version: SchemaVersion) -> Result<Self, SchemaMismatchError> {
        Ok(Self {
            schema: FeatureSchema::for_version(version)?,
        })
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema.version()
    }

    /// Encodes one record.
    ///
    /// # Errors
    ///
    /// `ValidationError` when severity is outside `[0, 10]` or not finite, or
    /// the age is implausible.
    pub fn engineer_features(
        &self,
        record: &StructuredSymptomRecord,
        demographics: &Demographics,
    ) -> Result<FeatureVector, ValidationError> {
        record.validate()?;
        demographics.validate()?;

        let values = match self.schema.version() {
            SchemaVersion::V1 => encode_v1(record, demographics),
            // `new` only accepts versions that `FeatureSchema::for_version` knows
            other => {
                return Err(ValidationError::invalid_format(
                    "schema_version",
                    format!("no encoder for {}", other),
                ))
            }
        };

        if let Some((name, _)) = self
            .schema
            .fields()
            .iter()
            .zip(&values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ValidationError::not_finite(name.clone()));
        }

        let vector = FeatureVector::from_values(self.schema.version(), values).map_err(|e| {
            ValidationError::invalid_format("feature_vector", e.to_string())
        })?;

        debug!(
            schema = %vector.schema_version(),
            symptom_count = record.categories().len(),
            red_flags = record.red_flags().len(),
            fingerprint = %vector.fingerprint(),
            "engineered feature vector"
        );

        Ok(vector)
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::v1(),
        }
    }
}

/// Encodes with the current schema.
pub fn engineer_features(
    record: &StructuredSymptomRecord,
    demographics: &Demographics,
) -> Result<FeatureVector, ValidationError> {
    FeatureEngineer::default().engineer_features(record, demographics)
}

fn indicator(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

fn encode_v1(record: &StructuredSymptomRecord, demographics: &Demographics) -> Vec<f64> {
    let flags = record.red_flags();
    let categories = record.categories();
    let mut values = Vec::with_capacity(FeatureSchema::v1().len());

    values.push(categories.len() as f64);
    values.push((record.severity() / MAX_SEVERITY).clamp(0.0, 1.0));
    values.push(flags.len() as f64);
    values.push(indicator(!flags.is_empty()));
    values.extend(RedFlag::all().iter().map(|flag| indicator(flags.contains(flag))));

    let days = record.duration().days().map(f64::from).unwrap_or(0.0);
    values.push(days);
    values.push((days / DURATION_NORMALIZER_DAYS).min(1.0));

    values.push(record.pattern().encoded());

    let age = demographics.age.map(f64::from).unwrap_or(AGE_SENTINEL_YEARS);
    values.push(age);
    values.push((age / AGE_NORMALIZER_YEARS).min(1.0));

    values.push(indicator(demographics.sex == Some(Sex::Male)));
    values.push(indicator(demographics.sex == Some(Sex::Female)));

    values.extend(
        SymptomCategory::all()
            .iter()
            .map(|category| indicator(categories.contains(category))),
    );

    values
}
