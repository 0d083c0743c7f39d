//! Symptoms Module - The structured symptom record and its vocabularies.
//!
//! The record is produced by an external parser (language model or keyword
//! fallback) and consumed read-only by the rest of the pipeline.

mod category;
mod demographics;
mod duration;
mod pattern;
mod record;
mod red_flag;

pub use category::SymptomCategory;
pub use demographics::{Demographics, Sex, MAX_AGE_YEARS};
pub use duration::{SymptomDuration, MAX_DURATION_DESCRIPTION};
pub use pattern::SymptomPattern;
pub use record::{ParseConfidence, StructuredSymptomRecord, MAX_SEVERITY, MIN_SEVERITY};
pub use red_flag::RedFlag;
