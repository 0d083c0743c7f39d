//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the deterministic core to everything around it:
//! - `ai` - Language model providers (OpenAI, Anthropic, mock)
//! - `parsing` - Symptom parsers and explanation prose
//! - `model` - Risk model artifact loading
//! - `storage` - Prediction audit trail

pub mod ai;
pub mod model;
pub mod parsing;
pub mod storage;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use model::{
    baseline_model, spectrum_model, JsonArtifactLoader, BASELINE_ARTIFACT_ID, SPECTRUM_ARTIFACT_ID,
};
pub use parsing::{KeywordSymptomParser, LlmProseGenerator, LlmSymptomParser};
pub use storage::InMemoryPredictionRecorder;
