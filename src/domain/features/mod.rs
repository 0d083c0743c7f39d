//! Features Module - Deterministic encoding of symptom reports.
//!
//! - `schema` - Versioned, fixed-order list of feature names
//! - `vector` - The encoded vector tagged with its schema version
//! - `engineer` - The pure record + demographics → vector transform

mod engineer;
mod schema;
mod vector;

pub use engineer::{
    engineer_features, FeatureEngineer, AGE_NORMALIZER_YEARS, AGE_SENTINEL_YEARS,
    DURATION_NORMALIZER_DAYS,
};
pub use schema::{
    category_field, red_flag_field, red_flag_for_field, FeatureSchema, SchemaMismatchError,
    SchemaVersion, AGE, AGE_NORMALIZED, DURATION_DAYS, DURATION_NORMALIZED, NORMALIZED_SEVERITY,
    PATTERN_ENCODED, RED_FLAG_ANY, RED_FLAG_COUNT, SEX_FEMALE, SEX_MALE, SYMPTOM_COUNT,
};
pub use vector::FeatureVector;
