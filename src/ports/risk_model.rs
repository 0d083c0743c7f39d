//! Risk Model Port - Opaque scorer over feature vectors.
//!
//! # Contract
//!
//! Implementations must:
//! - Be deterministic for a fixed artifact
//! - Reject vectors of any schema version other than their own
//! - Return `InvalidScore` rather than clamp an out-of-range output
//! - Be read-only at inference time so one instance can serve concurrent
//!   requests

use crate::domain::features::FeatureVector;
use crate::domain::risk::{FeatureContribution, ModelMetadata, RiskScore, ScoringError};

pub trait RiskModel: Send + Sync {
    /// Identity of the artifact behind this model.
    fn metadata(&self) -> &ModelMetadata;

    /// Probability of the positive (needs care) class.
    fn score(&self, features: &FeatureVector) -> Result<RiskScore, ScoringError>;

    /// Per-feature contributions in schema order.
    fn contributions(
        &self,
        features: &FeatureVector,
    ) -> Result<Vec<FeatureContribution>, ScoringError>;
}
