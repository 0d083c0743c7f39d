//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Inference Ports
//!
//! - `RiskModel` - Opaque scorer bound to one feature schema version
//! - `ModelArtifactLoader` - Resolves and validates model artifacts
//!
//! ## Language Model Ports
//!
//! - `AIProvider` - Non-streaming chat completions
//! - `SymptomParser` - Free text → structured symptom record
//! - `ProseGenerator` - Explanation wording
//!
//! ## Persistence Ports
//!
//! - `PredictionRecorder` - Audit records of every prediction

mod ai_provider;
mod model_loader;
mod prediction_recorder;
mod prose_generator;
mod risk_model;
mod symptom_parser;

pub use ai_provider::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, CompletionResponse, FinishReason,
    Message, MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use model_loader::{ModelArtifactLoader, ModelLoadError};
pub use prediction_recorder::{PredictionRecorder, RecorderError};
pub use prose_generator::{ProseError, ProseGenerator, ProseRequest};
pub use risk_model::RiskModel;
pub use symptom_parser::{ParseFailure, SymptomParser};
