//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands run the triage pipeline; queries read the audit trail back.

mod errors;
pub mod handlers;

pub use errors::TriageError;
pub use handlers::{
    GetReportHistoryHandler, GetReportHistoryQuery, RunTriageCommand, RunTriageHandler,
    RunTriageResult, SymptomInput,
};
