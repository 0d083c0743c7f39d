//! Explanation Module - Which facts to surface, and how to word them.
//!
//! Factor selection is deterministic. Only the final wording may be
//! delegated to a `ProseGenerator`, and its failure never fails a decision.

mod assembler;
mod factor;

pub use assembler::{
    templated_explanation, ExplanationAssembler, ExplanationDegraded, ExplanationSource,
    DEFAULT_TOP_K,
};
pub use factor::{ContributingFactor, FactorSignal};
