//! Model Adapters
//!
//! Implementation of the ModelArtifactLoader port plus the built-in baseline
//! and spectrum scorers.

mod json_artifact_loader;

pub use json_artifact_loader::{
    baseline_model, spectrum_model, JsonArtifactLoader, BASELINE_ARTIFACT_ID, SPECTRUM_ARTIFACT_ID,
};
