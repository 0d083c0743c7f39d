//! Serialized risk model artifacts.
//!
//! An artifact is a tagged variant: each classifier kind carries its own
//! parameters plus the header every kind shares (id, version, schema version,
//! ordered feature names). Artifacts are plain data; evaluation lives in
//! `LoadedRiskModel`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::spectrum::{SpectrumArtifact, SpectrumLayout};
use crate::domain::features::{FeatureSchema, SchemaMismatchError, SchemaVersion};

/// Classifier family of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    RandomForest,
    Spectrum,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LogisticRegression => "logistic_regression",
            ModelKind::RandomForest => "random_forest",
            ModelKind::Spectrum => "spectrum",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a loaded model, recorded with every prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_version: String,
    pub kind: ModelKind,
    pub schema_version: SchemaVersion,
    pub feature_count: usize,
}

/// Linear model: `sigmoid(intercept + Σ wᵢ·zᵢ)` where `zᵢ = (xᵢ - meanᵢ) / scaleᵢ`
/// when standardisation parameters are present, else `zᵢ = xᵢ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    pub model_id: String,
    pub model_version: String,
    pub schema_version: SchemaVersion,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub means: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Vec<f64>>,
}

/// One node of a flattened binary decision tree.
///
/// Samples with `x[feature] <= threshold` go to `left`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probability: f64,
    },
}

/// A tree stored as a flat node array rooted at index 0. Children always
/// sit at a higher index than their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

/// Ensemble of trees; the probability is the mean leaf probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestArtifact {
    pub model_id: String,
    pub model_version: String,
    pub schema_version: SchemaVersion,
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

/// Any supported classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegressionArtifact),
    RandomForest(RandomForestArtifact),
    Spectrum(SpectrumArtifact),
}

impl ModelArtifact {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelArtifact::LogisticRegression(_) => ModelKind::LogisticRegression,
            ModelArtifact::RandomForest(_) => ModelKind::RandomForest,
            ModelArtifact::Spectrum(_) => ModelKind::Spectrum,
        }
    }

    pub fn model_id(&self) -> &str {
        match self {
            ModelArtifact::LogisticRegression(a) => &a.model_id,
            ModelArtifact::RandomForest(a) => &a.model_id,
            ModelArtifact::Spectrum(a) => &a.model_id,
        }
    }

    pub fn model_version(&self) -> &str {
        match self {
            ModelArtifact::LogisticRegression(a) => &a.model_version,
            ModelArtifact::RandomForest(a) => &a.model_version,
            ModelArtifact::Spectrum(a) => &a.model_version,
        }
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            ModelArtifact::LogisticRegression(a) => a.schema_version,
            ModelArtifact::RandomForest(a) => a.schema_version,
            ModelArtifact::Spectrum(a) => a.schema_version,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        match self {
            ModelArtifact::LogisticRegression(a) => &a.feature_names,
            ModelArtifact::RandomForest(a) => &a.feature_names,
            ModelArtifact::Spectrum(a) => &a.feature_names,
        }
    }

    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            model_id: self.model_id().to_string(),
            model_version: self.model_version().to_string(),
            kind: self.kind(),
            schema_version: self.schema_version(),
            feature_count: self.feature_names().len(),
        }
    }

    /// Checks that this artifact consumes exactly the vectors of `expected`.
    ///
    /// Returns the schema the artifact is bound to.
    pub fn validate_against(
        &self,
        expected: SchemaVersion,
    ) -> Result<&'static FeatureSchema, SchemaMismatchError> {
        if self.schema_version() != expected {
            return Err(SchemaMismatchError::VersionMismatch {
                expected: self.schema_version(),
                actual: expected,
            });
        }
        let schema = FeatureSchema::for_version(expected)?;
        schema.check_names(self.feature_names())?;

        match self {
            ModelArtifact::LogisticRegression(a) => validate_logistic(a, schema.len())?,
            ModelArtifact::RandomForest(a) => validate_forest(a, schema.len())?,
            ModelArtifact::Spectrum(_) => {
                SpectrumLayout::resolve(schema)?;
            }
        }
        Ok(schema)
    }
}

fn check_length(parameter: &str, values: &[f64], expected: usize) -> Result<(), SchemaMismatchError> {
    if values.len() != expected {
        return Err(SchemaMismatchError::ParameterLength {
            parameter: parameter.to_string(),
            expected,
            actual: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SchemaMismatchError::malformed(format!(
            "{} contains a non-finite value",
            parameter
        )));
    }
    Ok(())
}

fn validate_logistic(
    artifact: &LogisticRegressionArtifact,
    width: usize,
) -> Result<(), SchemaMismatchError> {
    if !artifact.intercept.is_finite() {
        return Err(SchemaMismatchError::malformed("intercept is not finite"));
    }
    check_length("coefficients", &artifact.coefficients, width)?;

    match (&artifact.means, &artifact.scales) {
        (None, None) => Ok(()),
        (Some(means), Some(scales)) => {
            check_length("means", means, width)?;
            check_length("scales", scales, width)?;
            if scales.iter().any(|s| *s == 0.0) {
                return Err(SchemaMismatchError::malformed("scales contains zero"));
            }
            Ok(())
        }
        _ => Err(SchemaMismatchError::malformed(
            "means and scales must be given together",
        )),
    }
}

fn validate_forest(artifact: &RandomForestArtifact, width: usize) -> Result<(), SchemaMismatchError> {
    if artifact.trees.is_empty() {
        return Err(SchemaMismatchError::malformed("forest has no trees"));
    }

    for (t, tree) in artifact.trees.iter().enumerate() {
        if tree.nodes.is_empty() {
            return Err(SchemaMismatchError::malformed(format!("tree {} is empty", t)));
        }
        for (i, node) in tree.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= width {
                        return Err(SchemaMismatchError::malformed(format!(
                            "tree {} node {} splits on feature {} of {}",
                            t, i, feature, width
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(SchemaMismatchError::malformed(format!(
                            "tree {} node {} has a non-finite threshold",
                            t, i
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= tree.nodes.len() {
                            return Err(SchemaMismatchError::malformed(format!(
                                "tree {} node {} has invalid child index {}",
                                t, i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { probability } => {
                    if !probability.is_finite() {
                        return Err(SchemaMismatchError::malformed(format!(
                            "tree {} node {} has a non-finite leaf",
                            t, i
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}
