//! Storage Adapters
//!
//! Implementations of the PredictionRecorder port.
//!
//! ## Available Adapters
//!
//! - **InMemoryPredictionRecorder** - Keeps the audit trail in memory

mod in_memory_prediction_recorder;

pub use in_memory_prediction_recorder::InMemoryPredictionRecorder;
