//! LoadedRiskModel - a validated artifact ready for inference.
//!
//! Inference is read-only; one instance is shared across concurrent
//! requests behind an `Arc`.

use serde::Serialize;
use thiserror::Error;

use super::artifact::{LogisticRegressionArtifact, ModelArtifact, ModelMetadata, TreeNode};
use super::score::{InvalidScoreError, RiskScore};
use super::spectrum::SpectrumLayout;
use crate::domain::features::{FeatureSchema, FeatureVector, SchemaMismatchError, SchemaVersion};
use crate::ports::RiskModel;

/// Scoring failed. Both causes are fatal for the prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error(transparent)]
    InvalidScore(#[from] InvalidScoreError),
}

/// How much one feature pushed the score, in model units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub value: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone)]
pub struct LoadedRiskModel {
    artifact: ModelArtifact,
    schema: &'static FeatureSchema,
    metadata: ModelMetadata,
    /// Split-frequency importance per feature; forests only.
    importances: Vec<f64>,
    /// Resolved field positions; spectrum only.
    layout: Option<SpectrumLayout>,
}

impl LoadedRiskModel {
    /// Validates `artifact` against the schema the engineer produces.
    pub fn from_artifact(
        artifact: ModelArtifact,
        expected: SchemaVersion,
    ) -> Result<Self, SchemaMismatchError> {
        let schema = artifact.validate_against(expected)?;
        let importances = match &artifact {
            ModelArtifact::RandomForest(forest) => {
                let mut counts = vec![0.0; schema.len()];
                for node in forest.trees.iter().flat_map(|t| &t.nodes) {
                    if let TreeNode::Split { feature, .. } = node {
                        counts[*feature] += 1.0;
                    }
                }
                let total: f64 = counts.iter().sum();
                if total > 0.0 {
                    counts.iter_mut().for_each(|c| *c /= total);
                }
                counts
            }
            ModelArtifact::LogisticRegression(_) | ModelArtifact::Spectrum(_) => Vec::new(),
        };
        let layout = match &artifact {
            ModelArtifact::Spectrum(_) => Some(SpectrumLayout::resolve(schema)?),
            _ => None,
        };

        Ok(Self {
            metadata: artifact.metadata(),
            artifact,
            schema,
            importances,
            layout,
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    fn check_shape(&self, features: &FeatureVector) -> Result<(), SchemaMismatchError> {
        if features.schema_version() != self.schema.version() {
            return Err(SchemaMismatchError::VersionMismatch {
                expected: self.schema.version(),
                actual: features.schema_version(),
            });
        }
        if features.len() != self.schema.len() {
            return Err(SchemaMismatchError::LengthMismatch {
                expected: self.schema.len(),
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Unvalidated model output.
    fn raw_probability(&self, x: &[f64]) -> f64 {
        match &self.artifact {
            ModelArtifact::LogisticRegression(lr) => {
                let z = lr.intercept
                    + lr
                        .coefficients
                        .iter()
                        .enumerate()
                        .map(|(i, w)| w * standardize(lr, i, x[i]))
                        .sum::<f64>();
                sigmoid(z)
            }
            ModelArtifact::RandomForest(forest) => {
                let total: f64 = forest.trees.iter().map(|t| walk(&t.nodes, x)).sum();
                total / forest.trees.len() as f64
            }
            ModelArtifact::Spectrum(_) => match &self.layout {
                Some(layout) => layout.layers(x).combine(),
                None => f64::NAN,
            },
        }
    }
}

fn standardize(lr: &LogisticRegressionArtifact, i: usize, x: f64) -> f64 {
    match (&lr.means, &lr.scales) {
        (Some(means), Some(scales)) => (x - means[i]) / scales[i],
        _ => x,
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn walk(nodes: &[TreeNode], x: &[f64]) -> f64 {
    let mut index = 0;
    loop {
        match nodes.get(index) {
            Some(TreeNode::Leaf { probability }) => return *probability,
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                index = if x[*feature] <= *threshold { *left } else { *right };
            }
            // unreachable for validated artifacts; surfaces as InvalidScoreError
            None => return f64::NAN,
        }
    }
}

impl RiskModel for LoadedRiskModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn score(&self, features: &FeatureVector) -> Result<RiskScore, ScoringError> {
        self.check_shape(features)?;
        let raw = self.raw_probability(features.values());
        Ok(RiskScore::try_new(raw)?)
    }

    fn contributions(
        &self,
        features: &FeatureVector,
    ) -> Result<Vec<FeatureContribution>, ScoringError> {
        self.check_shape(features)?;
        let shares = match &self.layout {
            Some(layout) => layout.attribution(features.values()),
            None => Vec::new(),
        };
        let contributions = features
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                let contribution = match &self.artifact {
                    ModelArtifact::LogisticRegression(lr) => {
                        lr.coefficients[i] * standardize(lr, i, value)
                    }
                    ModelArtifact::RandomForest(_) => self.importances[i] * value,
                    ModelArtifact::Spectrum(_) => shares[i],
                };
                FeatureContribution {
                    feature: name.to_string(),
                    value,
                    contribution,
                }
            })
            .collect();
        Ok(contributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk::artifact::{DecisionTree, RandomForestArtifact};
    use crate::domain::risk::spectrum::{SpectrumArtifact, SPECTRUM_CEILING};

    fn names() -> Vec<String> {
        FeatureSchema::v1().fields().to_vec()
    }

    fn logistic(intercept: f64, severity_weight: f64) -> LoadedRiskModel {
        let mut coefficients = vec![0.0; 32];
        coefficients[1] = severity_weight;
        let artifact = ModelArtifact::LogisticRegression(LogisticRegressionArtifact {
            model_id: "lr".to_string(),
            model_version: "1.0.0".to_string(),
            schema_version: SchemaVersion::V1,
            feature_names: names(),
            intercept,
            coefficients,
            means: None,
            scales: None,
        });
        LoadedRiskModel::from_artifact(artifact, SchemaVersion::V1).unwrap()
    }

    fn forest(high_leaf: f64) -> LoadedRiskModel {
        let artifact = ModelArtifact::RandomForest(RandomForestArtifact {
            model_id: "rf".to_string(),
            model_version: "1.0.0".to_string(),
            schema_version: SchemaVersion::V1,
            feature_names: names(),
            trees: vec![
                DecisionTree {
                    nodes: vec![
                        TreeNode::Split {
                            feature: 1,
                            threshold: 0.5,
                            left: 1,
                            right: 2,
                        },
                        TreeNode::Leaf { probability: 0.1 },
                        TreeNode::Leaf {
                            probability: high_leaf,
                        },
                    ],
                },
                DecisionTree {
                    nodes: vec![TreeNode::Leaf { probability: 0.3 }],
                },
            ],
        });
        LoadedRiskModel::from_artifact(artifact, SchemaVersion::V1).unwrap()
    }

    fn vector_with_severity(severity: f64) -> FeatureVector {
        let mut values = vec![0.0; 32];
        values[1] = severity;
        FeatureVector::from_values(SchemaVersion::V1, values).unwrap()
    }

    #[test]
    fn logistic_scores_with_sigmoid() {
        let model = logistic(0.0, 0.0);
        let score = model.score(&vector_with_severity(0.5)).unwrap();
        assert!((score.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn logistic_is_monotonic_in_positive_weight() {
        let model = logistic(-2.0, 4.0);
        let low = model.score(&vector_with_severity(0.2)).unwrap();
        let high = model.score(&vector_with_severity(0.9)).unwrap();
        assert!(high > low);
    }

    #[test]
    fn standardisation_is_applied() {
        let mut coefficients = vec![0.0; 32];
        coefficients[1] = 1.0;
        let mut means = vec![0.0; 32];
        means[1] = 0.5;
        let artifact = ModelArtifact::LogisticRegression(LogisticRegressionArtifact {
            model_id: "lr".to_string(),
            model_version: "1".to_string(),
            schema_version: SchemaVersion::V1,
            feature_names: names(),
            intercept: 0.0,
            coefficients,
            means: Some(means),
            scales: Some(vec![1.0; 32]),
        });
        let model = LoadedRiskModel::from_artifact(artifact, SchemaVersion::V1).unwrap();
        let score = model.score(&vector_with_severity(0.5)).unwrap();
        assert!((score.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn forest_averages_leaves() {
        let model = forest(0.9);
        let score = model.score(&vector_with_severity(0.8)).unwrap();
        assert!((score.value() - 0.6).abs() < 1e-12);
        let score = model.score(&vector_with_severity(0.2)).unwrap();
        assert!((score.value() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_leaf_is_invalid_score_not_clamped() {
        let model = forest(3.0);
        let err = model.score(&vector_with_severity(0.9)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidScore(InvalidScoreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn logistic_contributions_are_weight_times_value() {
        let model = logistic(-1.0, 4.0);
        let contributions = model.contributions(&vector_with_severity(0.5)).unwrap();
        assert_eq!(contributions.len(), 32);
        assert_eq!(contributions[1].feature, "normalized_severity");
        assert_eq!(contributions[1].contribution, 2.0);
        assert_eq!(contributions[0].contribution, 0.0);
    }

    #[test]
    fn forest_contributions_use_split_frequency() {
        let model = forest(0.9);
        let contributions = model.contributions(&vector_with_severity(0.5)).unwrap();
        assert_eq!(contributions[1].contribution, 0.5);
    }

    #[test]
    fn metadata_reflects_artifact() {
        let model = forest(0.9);
        assert_eq!(model.metadata().model_id, "rf");
        assert_eq!(model.metadata().kind.as_str(), "random_forest");
        assert_eq!(model.metadata().schema_version, SchemaVersion::V1);
    }

    #[test]
    fn scoring_is_deterministic() {
        let model = logistic(-3.0, 5.0);
        let vector = vector_with_severity(0.7);
        assert_eq!(model.score(&vector).unwrap(), model.score(&vector).unwrap());
    }

    fn spectrum() -> LoadedRiskModel {
        let artifact =
            ModelArtifact::Spectrum(SpectrumArtifact::for_schema("layered", FeatureSchema::v1()));
        LoadedRiskModel::from_artifact(artifact, SchemaVersion::V1).unwrap()
    }

    #[test]
    fn spectrum_rises_with_severity_and_stays_capped() {
        let model = spectrum();
        let low = model.score(&vector_with_severity(0.2)).unwrap();
        let high = model.score(&vector_with_severity(0.9)).unwrap();
        let top = model.score(&vector_with_severity(1.0)).unwrap();

        assert!(high > low);
        assert!(top.value() <= SPECTRUM_CEILING);
        assert_eq!(model.metadata().kind.as_str(), "spectrum");
    }

    #[test]
    fn spectrum_contributions_credit_severity() {
        let model = spectrum();
        let contributions = model.contributions(&vector_with_severity(0.5)).unwrap();
        assert_eq!(contributions.len(), 32);
        assert!(contributions[1].contribution > 0.0);
        assert_eq!(contributions[0].contribution, 0.0);
    }
}
