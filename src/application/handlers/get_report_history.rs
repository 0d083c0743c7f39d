//! GetReportHistoryHandler - Query handler for a report's recorded predictions.

use std::sync::Arc;

use crate::application::errors::TriageError;
use crate::domain::foundation::SymptomReportId;
use crate::domain::triage::PredictionRecord;
use crate::ports::PredictionRecorder;

/// Query for the predictions recorded against one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetReportHistoryQuery {
    pub report_id: SymptomReportId,
}

pub struct GetReportHistoryHandler {
    recorder: Arc<dyn PredictionRecorder>,
}

impl GetReportHistoryHandler {
    pub fn new(recorder: Arc<dyn PredictionRecorder>) -> Self {
        Self { recorder }
    }

    /// Predictions oldest first. A report with none is `ReportNotFound`.
    pub async fn handle(
        &self,
        query: GetReportHistoryQuery,
    ) -> Result<Vec<PredictionRecord>, TriageError> {
        let predictions = self.recorder.list_for_report(query.report_id).await?;
        if predictions.is_empty() {
            return Err(TriageError::ReportNotFound(query.report_id));
        }
        Ok(predictions)
    }
}
