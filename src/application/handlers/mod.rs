//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

mod get_report_history;
mod run_triage;

pub use get_report_history::{GetReportHistoryHandler, GetReportHistoryQuery};
pub use run_triage::{RunTriageCommand, RunTriageHandler, RunTriageResult, SymptomInput};
