//! Prose Generator Port - Wording for triage explanations.
//!
//! Only wording is delegated. The factors, label and score are fixed before
//! the generator is called.

use async_trait::async_trait;
use thiserror::Error;

use super::ai_provider::AIError;
use crate::domain::explanation::ContributingFactor;
use crate::domain::risk::RiskScore;
use crate::domain::triage::{DecisionBasis, TriageLabel};

/// Facts the generator may put into words.
#[derive(Debug, Clone, PartialEq)]
pub struct ProseRequest {
    pub label: TriageLabel,
    pub score: RiskScore,
    pub basis: DecisionBasis,
    pub severity: f64,
    pub factors: Vec<ContributingFactor>,
    /// The deterministic explanation, for reference.
    pub templated: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProseError {
    #[error("prose generator unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Provider(#[from] AIError),
}

#[async_trait]
pub trait ProseGenerator: Send + Sync {
    async fn generate(&self, request: &ProseRequest) -> Result<String, ProseError>;
}
