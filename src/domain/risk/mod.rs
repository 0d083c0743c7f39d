//! Risk Module - Classical classifiers consumed as opaque scorers.
//!
//! Model artifacts are interchangeable tagged variants. Whatever the kind,
//! a loaded model is bound to one feature schema version and its output is
//! validated into a `RiskScore` before anything downstream sees it.
//!
//! Kinds: logistic regression, random forest, and the layered `spectrum`
//! rule scorer.

mod artifact;
mod model;
mod score;
mod spectrum;

pub use artifact::{
    DecisionTree, LogisticRegressionArtifact, ModelArtifact, ModelKind, ModelMetadata,
    RandomForestArtifact, TreeNode,
};
pub use model::{FeatureContribution, LoadedRiskModel, ScoringError};
pub use score::{InvalidScoreError, RiskScore};
pub use spectrum::{
    severity_curve, SpectrumArtifact, SpectrumLayers, SpectrumLayout, SPECTRUM_CEILING,
};
