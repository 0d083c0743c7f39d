//! Domain layer containing the deterministic triage core.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors)
//! - `symptoms` - The structured symptom record and its vocabularies
//! - `features` - Versioned feature schema and the feature engineer
//! - `risk` - Model artifacts, loaded models and validated risk scores
//! - `triage` - Threshold bands, safety override and decisions
//! - `explanation` - Factor selection and explanation wording

pub mod explanation;
pub mod features;
pub mod foundation;
pub mod risk;
pub mod symptoms;
pub mod triage;
