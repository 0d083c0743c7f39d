//! Application errors - what a failed prediction reports to its caller.
//!
//! Only the explanation prose degrades gracefully, and it never surfaces
//! here. Everything below is a failed prediction; no label is produced.

use thiserror::Error;

use crate::domain::features::SchemaMismatchError;
use crate::domain::foundation::{ErrorCode, SymptomReportId, ValidationError};
use crate::domain::risk::{InvalidScoreError, ScoringError};
use crate::ports::{ModelLoadError, RecorderError};

#[derive(Debug, Error)]
pub enum TriageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error(transparent)]
    InvalidScore(#[from] InvalidScoreError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error("failed to record prediction: {0}")]
    Persistence(#[from] RecorderError),

    #[error("no predictions recorded for report {0}")]
    ReportNotFound(SymptomReportId),
}

impl From<ScoringError> for TriageError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::SchemaMismatch(e) => TriageError::SchemaMismatch(e),
            ScoringError::InvalidScore(e) => TriageError::InvalidScore(e),
        }
    }
}

impl TriageError {
    /// Stable code for callers that branch on the failure kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            TriageError::Validation(_) => ErrorCode::ValidationFailed,
            TriageError::SchemaMismatch(_) => ErrorCode::SchemaMismatch,
            TriageError::InvalidScore(_) => ErrorCode::InvalidScore,
            TriageError::ModelLoad(ModelLoadError::SchemaMismatch(_)) => ErrorCode::SchemaMismatch,
            TriageError::ModelLoad(_) => ErrorCode::ModelLoadFailed,
            TriageError::Persistence(_) => ErrorCode::PersistenceFailed,
            TriageError::ReportNotFound(_) => ErrorCode::ReportNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::SchemaVersion;

    #[test]
    fn scoring_errors_keep_their_kind() {
        let err: TriageError = ScoringError::InvalidScore(InvalidScoreError::OutOfRange { raw: 1.2 }).into();
        assert_eq!(err.code(), ErrorCode::InvalidScore);

        let err: TriageError = ScoringError::SchemaMismatch(SchemaMismatchError::LengthMismatch {
            expected: 32,
            actual: 3,
        })
        .into();
        assert_eq!(err.code(), ErrorCode::SchemaMismatch);
    }

    #[test]
    fn model_load_schema_mismatch_is_reported_as_schema_mismatch() {
        let err: TriageError = ModelLoadError::SchemaMismatch(SchemaMismatchError::UnsupportedVersion {
            requested: SchemaVersion::new(9),
        })
        .into();
        assert_eq!(err.code(), ErrorCode::SchemaMismatch);

        let err: TriageError = ModelLoadError::NotFound("m.json".to_string()).into();
        assert_eq!(err.code(), ErrorCode::ModelLoadFailed);
    }

    #[test]
    fn persistence_failure_has_code() {
        let err: TriageError = RecorderError::Unavailable("down".to_string()).into();
        assert_eq!(err.code(), ErrorCode::PersistenceFailed);
        assert_eq!(err.code().to_string(), "PERSISTENCE_FAILED");
    }
}
