//! RunTriageHandler - One symptom report in, one recorded triage decision out.
//!
//! Parse (or accept a structured record) → engineer → score → decide →
//! explain → record. Parsing failures become the low-confidence record;
//! every later failure fails the prediction.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::application::errors::TriageError;
use crate::domain::explanation::ExplanationAssembler;
use crate::domain::features::{FeatureEngineer, FeatureVector, SchemaVersion};
use crate::domain::foundation::{PredictionId, SymptomReportId};
use crate::domain::symptoms::{Demographics, StructuredSymptomRecord};
use crate::domain::triage::{PredictionRecord, TriageDecision, TriageEngine};
use crate::ports::{PredictionRecorder, RiskModel, SymptomParser};

/// Where the symptoms come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SymptomInput {
    /// Free text for the configured parser.
    Text(String),
    /// Already structured upstream; parsing is skipped.
    Structured(StructuredSymptomRecord),
}

/// Command to triage one symptom report.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTriageCommand {
    /// Generated when absent.
    pub report_id: Option<SymptomReportId>,
    pub input: SymptomInput,
    pub demographics: Demographics,
}

impl RunTriageCommand {
    pub fn from_text(text: impl Into<String>, demographics: Demographics) -> Self {
        Self {
            report_id: None,
            input: SymptomInput::Text(text.into()),
            demographics,
        }
    }

    pub fn from_record(record: StructuredSymptomRecord, demographics: Demographics) -> Self {
        Self {
            report_id: None,
            input: SymptomInput::Structured(record),
            demographics,
        }
    }

    pub fn with_report_id(mut self, report_id: SymptomReportId) -> Self {
        self.report_id = Some(report_id);
        self
    }
}

/// Result of a successful prediction.
#[derive(Debug, Clone, Serialize)]
pub struct RunTriageResult {
    pub report_id: SymptomReportId,
    pub prediction_id: PredictionId,
    pub decision: TriageDecision,
    pub features: FeatureVector,
    pub schema_version: SchemaVersion,
    pub model_version: String,
}

/// Handler for triage requests.
pub struct RunTriageHandler {
    parser: Arc<dyn SymptomParser>,
    engineer: FeatureEngineer,
    model: Arc<dyn RiskModel>,
    engine: TriageEngine,
    assembler: ExplanationAssembler,
    recorder: Arc<dyn PredictionRecorder>,
}

impl RunTriageHandler {
    /// Uses the default engineer, engine and assembler.
    pub fn new(
        parser: Arc<dyn SymptomParser>,
        model: Arc<dyn RiskModel>,
        recorder: Arc<dyn PredictionRecorder>,
    ) -> Self {
        Self {
            parser,
            engineer: FeatureEngineer::default(),
            model,
            engine: TriageEngine::default(),
            assembler: ExplanationAssembler::default(),
            recorder,
        }
    }

    pub fn with_engineer(mut self, engineer: FeatureEngineer) -> Self {
        self.engineer = engineer;
        self
    }

    pub fn with_engine(mut self, engine: TriageEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_assembler(mut self, assembler: ExplanationAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub async fn handle(&self, cmd: RunTriageCommand) -> Result<RunTriageResult, TriageError> {
        let report_id = cmd.report_id.unwrap_or_default();

        // 1. Structured record; parse failures are never fatal
        let record = match cmd.input {
            SymptomInput::Structured(record) => record,
            SymptomInput::Text(text) => self.parse(report_id, &text).await,
        };

        // 2. Features
        let features = self
            .engineer
            .engineer_features(&record, &cmd.demographics)?;

        // 3. Score and contributions
        let score = self.model.score(&features)?;
        let contributions = self.model.contributions(&features)?;

        // 4. Decide, then explain
        let outcome = self.engine.decide(score, &record);
        let decision = self.assembler.explain(&outcome, &record, &contributions).await;

        // 5. Record
        let model = self.model.metadata().clone();
        let model_version = model.model_version.clone();
        let prediction = PredictionRecord::new(
            report_id,
            record,
            cmd.demographics,
            features.clone(),
            model,
            decision.clone(),
        );
        if let Err(err) = self.recorder.record(&prediction).await {
            error!(%report_id, error = %err, "failed to record prediction");
            return Err(err.into());
        }

        info!(
            %report_id,
            prediction_id = %prediction.id,
            label = decision.label.as_str(),
            risk_score = decision.risk_score.value(),
            override_applied = decision.basis.is_override(),
            model_version = %model_version,
            "triage prediction recorded"
        );

        Ok(RunTriageResult {
            report_id,
            prediction_id: prediction.id,
            decision,
            schema_version: features.schema_version(),
            features,
            model_version,
        })
    }

    async fn parse(&self, report_id: SymptomReportId, text: &str) -> StructuredSymptomRecord {
        match self.parser.parse(report_id, text).await {
            Ok(record) => record,
            Err(failure) => {
                warn!(
                    %report_id,
                    parser = self.parser.name(),
                    error = %failure,
                    "symptom parse failed, using low-confidence record"
                );
                StructuredSymptomRecord::low_confidence()
            }
        }
    }
}
