//! Temporal pattern of a symptom.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the symptom presents over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SymptomPattern {
    Intermittent,
    #[default]
    Constant,
    Progressive,
    Acute,
}

impl SymptomPattern {
    /// Ordinal encoding used by the `pattern_encoded` feature.
    pub fn encoded(&self) -> f64 {
        match self {
            SymptomPattern::Intermittent => 0.25,
            SymptomPattern::Constant => 0.5,
            SymptomPattern::Progressive => 0.75,
            SymptomPattern::Acute => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomPattern::Intermittent => "intermittent",
            SymptomPattern::Constant => "constant",
            SymptomPattern::Progressive => "progressive",
            SymptomPattern::Acute => "acute",
        }
    }

    /// Unknown patterns fall back to `Constant`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "intermittent" => SymptomPattern::Intermittent,
            "progressive" | "worsening" => SymptomPattern::Progressive,
            "acute" | "sudden" => SymptomPattern::Acute,
            _ => SymptomPattern::Constant,
        }
    }
}

impl From<String> for SymptomPattern {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for SymptomPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_monotonic_in_urgency() {
        assert!(SymptomPattern::Intermittent.encoded() < SymptomPattern::Constant.encoded());
        assert!(SymptomPattern::Constant.encoded() < SymptomPattern::Progressive.encoded());
        assert!(SymptomPattern::Progressive.encoded() < SymptomPattern::Acute.encoded());
    }

    #[test]
    fn unknown_pattern_defaults_to_constant() {
        assert_eq!(SymptomPattern::parse("sporadic-ish"), SymptomPattern::Constant);
        assert_eq!(SymptomPattern::default(), SymptomPattern::Constant);
    }

    #[test]
    fn deserializes_case_insensitively() {
        let pattern: SymptomPattern = serde_json::from_str("\"ACUTE\"").unwrap();
        assert_eq!(pattern, SymptomPattern::Acute);
    }
}
