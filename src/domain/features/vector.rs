//! FeatureVector - fixed-shape numeric encoding of a symptom report.

use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;
use sha2::{Digest, Sha256};

use super::schema::{FeatureSchema, SchemaMismatchError, SchemaVersion};

/// Ordered feature values tagged with the schema version that defines them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: &'static FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wraps values that are already laid out in schema order.
    pub fn from_values(
        version: SchemaVersion,
        values: Vec<f64>,
    ) -> Result<Self, SchemaMismatchError> {
        let schema = FeatureSchema::for_version(version)?;
        if values.len() != schema.len() {
            return Err(SchemaMismatchError::LengthMismatch {
                expected: schema.len(),
                actual: values.len(),
            });
        }
        Ok(Self { schema, values })
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema.version()
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.index_of(name).map(|i| self.values[i])
    }

    /// (name, value) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// SHA-256 over the schema version and the exact bit pattern of every value.
    ///
    /// Two vectors share a fingerprint only if they are bit-identical.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.schema.version().value().to_le_bytes());
        for value in &self.values {
            hasher.update(value.to_bits().to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FeatureVector", 3)?;
        state.serialize_field("schema_version", &self.schema.version())?;
        state.serialize_field("names", self.schema.fields())?;
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros() -> FeatureVector {
        FeatureVector::from_values(SchemaVersion::V1, vec![0.0; 32]).unwrap()
    }

    #[test]
    fn from_values_rejects_wrong_length() {
        let result = FeatureVector::from_values(SchemaVersion::V1, vec![0.0; 5]);
        assert!(matches!(
            result,
            Err(SchemaMismatchError::LengthMismatch { expected: 32, actual: 5 })
        ));
    }

    #[test]
    fn get_looks_up_by_name() {
        let mut values = vec![0.0; 32];
        values[1] = 0.8;
        let vector = FeatureVector::from_values(SchemaVersion::V1, values).unwrap();
        assert_eq!(vector.get("normalized_severity"), Some(0.8));
        assert_eq!(vector.get("not_a_feature"), None);
    }

    #[test]
    fn iter_pairs_names_with_values() {
        let vector = zeros();
        let first = vector.iter().next().unwrap();
        assert_eq!(first, ("symptom_count", 0.0));
        assert_eq!(vector.iter().count(), 32);
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = zeros();
        let b = zeros();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut values = vec![0.0; 32];
        values[0] = 1.0;
        let c = FeatureVector::from_values(SchemaVersion::V1, values).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_signed_zero() {
        let mut values = vec![0.0; 32];
        values[3] = -0.0;
        let negative = FeatureVector::from_values(SchemaVersion::V1, values).unwrap();
        assert_ne!(zeros().fingerprint(), negative.fingerprint());
    }

    #[test]
    fn serializes_with_names() {
        let json = serde_json::to_value(zeros()).unwrap();
        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["names"][0], "symptom_count");
        assert_eq!(json["values"].as_array().unwrap().len(), 32);
    }
}
