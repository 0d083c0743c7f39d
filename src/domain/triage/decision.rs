//! TriageDecision and the audit record persisted for every prediction.

use serde::Serialize;

use super::engine::DecisionBasis;
use super::label::TriageLabel;
use crate::domain::explanation::{ContributingFactor, ExplanationSource};
use crate::domain::features::{FeatureVector, SchemaVersion};
use crate::domain::foundation::{PredictionId, SymptomReportId, Timestamp};
use crate::domain::risk::{ModelMetadata, RiskScore};
use crate::domain::symptoms::{Demographics, StructuredSymptomRecord};

/// The complete answer for one symptom report. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageDecision {
    pub label: TriageLabel,
    pub category_text: String,
    pub risk_score: RiskScore,
    pub basis: DecisionBasis,
    pub borderline: bool,
    pub explanation_text: String,
    pub explanation_source: ExplanationSource,
    pub contributing_factors: Vec<ContributingFactor>,
}

/// Everything needed to reproduce a prediction later.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub report_id: SymptomReportId,
    pub record: StructuredSymptomRecord,
    pub demographics: Demographics,
    pub features: FeatureVector,
    pub feature_fingerprint: String,
    pub schema_version: SchemaVersion,
    pub model: ModelMetadata,
    pub decision: TriageDecision,
    pub created_at: Timestamp,
}

impl PredictionRecord {
    pub fn new(
        report_id: SymptomReportId,
        record: StructuredSymptomRecord,
        demographics: Demographics,
        features: FeatureVector,
        model: ModelMetadata,
        decision: TriageDecision,
    ) -> Self {
        Self {
            id: PredictionId::new(),
            report_id,
            record,
            demographics,
            feature_fingerprint: features.fingerprint(),
            schema_version: features.schema_version(),
            features,
            model,
            decision,
            created_at: Timestamp::now(),
        }
    }
}
