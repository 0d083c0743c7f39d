//! Symptom Parser Port - Free text → structured symptom record.
//!
//! Parsing is nondeterministic and may be network-bound. Callers treat any
//! `ParseFailure` as the low-confidence record rather than failing the
//! prediction.

use async_trait::async_trait;
use thiserror::Error;

use super::ai_provider::AIError;
use crate::domain::foundation::SymptomReportId;
use crate::domain::symptoms::StructuredSymptomRecord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    #[error("symptom text is empty")]
    EmptyText,

    #[error("parser output is not a valid symptom record: {0}")]
    Malformed(String),

    #[error(transparent)]
    Provider(#[from] AIError),
}

#[async_trait]
pub trait SymptomParser: Send + Sync {
    async fn parse(
        &self,
        report_id: SymptomReportId,
        text: &str,
    ) -> Result<StructuredSymptomRecord, ParseFailure>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
