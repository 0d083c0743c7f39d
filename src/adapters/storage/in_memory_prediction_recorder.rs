//! In-Memory Prediction Recorder
//!
//! Keeps the audit trail in memory, grouped by symptom report.
//! Useful for testing and for the one-shot binary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SymptomReportId;
use crate::domain::triage::PredictionRecord;
use crate::ports::{PredictionRecorder, RecorderError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryPredictionRecorder {
    records: Arc<RwLock<HashMap<SymptomReportId, Vec<PredictionRecord>>>>,
    /// When set, every write fails. For exercising persistence failures.
    unavailable: Arc<AtomicBool>,
}

impl InMemoryPredictionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of stored predictions.
    pub async fn len(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl PredictionRecorder for InMemoryPredictionRecorder {
    async fn record(&self, prediction: &PredictionRecord) -> Result<(), RecorderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecorderError::Unavailable(
                "in-memory recorder marked unavailable".to_string(),
            ));
        }

        let mut records = self.records.write().await;
        let entries = records.entry(prediction.report_id).or_default();
        if entries.iter().any(|existing| existing.id == prediction.id) {
            return Err(RecorderError::Duplicate(prediction.id.to_string()));
        }
        entries.push(prediction.clone());
        Ok(())
    }

    async fn list_for_report(
        &self,
        report_id: SymptomReportId,
    ) -> Result<Vec<PredictionRecord>, RecorderError> {
        let records = self.records.read().await;
        Ok(records.get(&report_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::explanation::ExplanationSource;
    use crate::domain::features::engineer_features;
    use crate::domain::risk::{ModelKind, ModelMetadata, RiskScore};
    use crate::domain::symptoms::{Demographics, StructuredSymptomRecord};
    use crate::domain::triage::{DecisionBasis, TriageDecision, TriageLabel};

    fn prediction(report_id: SymptomReportId) -> PredictionRecord {
        let record = StructuredSymptomRecord::new(3.0);
        let demographics = Demographics::unknown();
        let features = engineer_features(&record, &demographics).unwrap();
        let model = ModelMetadata {
            model_id: "m".to_string(),
            model_version: "1".to_string(),
            kind: ModelKind::LogisticRegression,
            schema_version: features.schema_version(),
            feature_count: features.len(),
        };
        let decision = TriageDecision {
            label: TriageLabel::SelfCare,
            category_text: TriageLabel::SelfCare.category_text().to_string(),
            risk_score: RiskScore::try_new(0.1).unwrap(),
            basis: DecisionBasis::Threshold,
            borderline: false,
            explanation_text: "text".to_string(),
            explanation_source: ExplanationSource::Templated,
            contributing_factors: Vec::new(),
        };
        PredictionRecord::new(report_id, record, demographics, features, model, decision)
    }

    #[tokio::test]
    async fn records_and_lists_by_report() {
        let recorder = InMemoryPredictionRecorder::new();
        let report = SymptomReportId::new();
        let other = SymptomReportId::new();

        recorder.record(&prediction(report)).await.unwrap();
        recorder.record(&prediction(report)).await.unwrap();
        recorder.record(&prediction(other)).await.unwrap();

        assert_eq!(recorder.list_for_report(report).await.unwrap().len(), 2);
        assert_eq!(recorder.list_for_report(other).await.unwrap().len(), 1);
        assert_eq!(recorder.len().await, 3);
    }

    #[tokio::test]
    async fn unknown_report_lists_empty() {
        let recorder = InMemoryPredictionRecorder::new();
        let listed = recorder.list_for_report(SymptomReportId::new()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn duplicate_prediction_is_rejected() {
        let recorder = InMemoryPredictionRecorder::new();
        let p = prediction(SymptomReportId::new());
        recorder.record(&p).await.unwrap();
        assert!(matches!(
            recorder.record(&p).await,
            Err(RecorderError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn unavailable_recorder_fails_writes() {
        let recorder = InMemoryPredictionRecorder::new();
        recorder.set_unavailable(true);
        let result = recorder.record(&prediction(SymptomReportId::new())).await;
        assert!(matches!(result, Err(RecorderError::Unavailable(_))));
        assert!(recorder.is_empty().await);
    }
}
