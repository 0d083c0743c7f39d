//! Triage Module - Deterministic thresholding of risk scores.
//!
//! - `label` - The three terminal categories
//! - `thresholds` - Configurable band boundaries
//! - `engine` - Banding plus the always-urgent safety override
//! - `decision` - The assembled decision and its audit record

mod decision;
mod engine;
mod label;
mod thresholds;

pub use decision::{PredictionRecord, TriageDecision};
pub use engine::{DecisionBasis, TriageEngine, TriageOutcome, BORDERLINE_MARGIN};
pub use label::TriageLabel;
pub use thresholds::{TriageThresholds, DEFAULT_CONSULT_THRESHOLD, DEFAULT_URGENT_THRESHOLD};
