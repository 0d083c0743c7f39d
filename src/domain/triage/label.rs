//! Triage label - the system's only externally meaningful category.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageLabel {
    Urgent,
    Consult,
    SelfCare,
}

impl TriageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLabel::Urgent => "urgent",
            TriageLabel::Consult => "consult",
            TriageLabel::SelfCare => "self_care",
        }
    }

    /// Patient-facing instruction.
    pub fn category_text(&self) -> &'static str {
        match self {
            TriageLabel::Urgent => "Seek care now",
            TriageLabel::Consult => "Consult GP",
            TriageLabel::SelfCare => "Monitor at home",
        }
    }

    /// 0 for the least severe band, 2 for the most.
    pub fn severity_rank(&self) -> u8 {
        match self {
            TriageLabel::SelfCare => 0,
            TriageLabel::Consult => 1,
            TriageLabel::Urgent => 2,
        }
    }
}

impl fmt::Display for TriageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
