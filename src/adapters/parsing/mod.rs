//! Parsing Adapters
//!
//! Implementations of the SymptomParser and ProseGenerator ports.
//!
//! ## Available Adapters
//!
//! - **KeywordSymptomParser** - Deterministic keyword extraction, no network
//! - **LlmSymptomParser** - Language-model extraction with keyword fallback
//! - **LlmProseGenerator** - Language-model wording for explanations

mod keyword_parser;
mod llm_parser;
mod llm_prose;

pub use keyword_parser::KeywordSymptomParser;
pub use llm_parser::{LlmSymptomParser, SYMPTOM_PARSING_SYSTEM_PROMPT};
pub use llm_prose::LlmProseGenerator;
