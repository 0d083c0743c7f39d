//! Prediction Recorder Port - Audit trail of triage predictions.
//!
//! Records are append-only; the pipeline never reads back a stored decision
//! to produce a new one.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SymptomReportId;
use crate::domain::triage::PredictionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("prediction store unavailable: {0}")]
    Unavailable(String),

    #[error("prediction already recorded: {0}")]
    Duplicate(String),
}

#[async_trait]
pub trait PredictionRecorder: Send + Sync {
    async fn record(&self, prediction: &PredictionRecord) -> Result<(), RecorderError>;

    /// Predictions for a report, oldest first.
    async fn list_for_report(
        &self,
        report_id: SymptomReportId,
    ) -> Result<Vec<PredictionRecord>, RecorderError>;
}
