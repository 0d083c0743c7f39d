//! Red flags: boolean clinical indicators that signal elevated urgency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Red flags known to feature schema v1, in indicator order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RedFlag {
    SevereChestPain,
    DifficultyBreathing,
    LossOfConsciousness,
    CriticalSeverity,
    ActiveBleeding,
    Fracture,
    Dislocation,
    TraumaticInjury,
    MultipleInjuries,
    Other,
}

impl RedFlag {
    /// Returns all red flags in schema order.
    pub fn all() -> &'static [RedFlag] {
        &[
            RedFlag::SevereChestPain,
            RedFlag::DifficultyBreathing,
            RedFlag::LossOfConsciousness,
            RedFlag::CriticalSeverity,
            RedFlag::ActiveBleeding,
            RedFlag::Fracture,
            RedFlag::Dislocation,
            RedFlag::TraumaticInjury,
            RedFlag::MultipleInjuries,
            RedFlag::Other,
        ]
    }

    /// Default always-urgent subset.
    pub fn default_always_urgent() -> &'static [RedFlag] {
        &[
            RedFlag::SevereChestPain,
            RedFlag::DifficultyBreathing,
            RedFlag::LossOfConsciousness,
            RedFlag::CriticalSeverity,
            RedFlag::ActiveBleeding,
        ]
    }

    /// Position of this flag in the schema order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Canonical snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedFlag::SevereChestPain => "severe_chest_pain",
            RedFlag::DifficultyBreathing => "difficulty_breathing",
            RedFlag::LossOfConsciousness => "loss_of_consciousness",
            RedFlag::CriticalSeverity => "critical_severity",
            RedFlag::ActiveBleeding => "active_bleeding",
            RedFlag::Fracture => "fracture",
            RedFlag::Dislocation => "dislocation",
            RedFlag::TraumaticInjury => "traumatic_injury",
            RedFlag::MultipleInjuries => "multiple_injuries",
            RedFlag::Other => "other",
        }
    }

    /// Human readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            RedFlag::SevereChestPain => "severe chest pain",
            RedFlag::DifficultyBreathing => "difficulty breathing",
            RedFlag::LossOfConsciousness => "loss of consciousness",
            RedFlag::CriticalSeverity => "critical severity",
            RedFlag::ActiveBleeding => "active bleeding",
            RedFlag::Fracture => "possible fracture",
            RedFlag::Dislocation => "possible dislocation",
            RedFlag::TraumaticInjury => "traumatic injury",
            RedFlag::MultipleInjuries => "multiple injuries",
            RedFlag::Other => "other warning sign",
        }
    }

    /// Strict lookup by canonical identifier. Case, spaces and hyphens are
    /// normalised first, so `"Loss of consciousness"` still matches.
    pub fn from_identifier(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::all()
            .iter()
            .copied()
            .find(|flag| flag.as_str() == normalized)
    }

    /// Maps a free-form identifier onto the vocabulary; unknown values become `Other`.
    pub fn parse(raw: &str) -> Self {
        Self::from_identifier(raw).unwrap_or(RedFlag::Other)
    }
}

impl From<String> for RedFlag {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, flag) in RedFlag::all().iter().enumerate() {
            assert_eq!(flag.index(), i);
        }
    }

    #[test]
    fn from_identifier_is_strict() {
        assert_eq!(
            RedFlag::from_identifier("LOSS_OF_CONSCIOUSNESS"),
            Some(RedFlag::LossOfConsciousness)
        );
        assert_eq!(RedFlag::from_identifier("flag_0"), None);
    }

    #[test]
    fn spaced_and_hyphenated_identifiers_match() {
        assert_eq!(RedFlag::parse("Severe Chest Pain"), RedFlag::SevereChestPain);
        assert_eq!(RedFlag::parse("severe-chest-pain"), RedFlag::SevereChestPain);
        assert_eq!(
            RedFlag::from_identifier(" loss of consciousness "),
            Some(RedFlag::LossOfConsciousness)
        );
        assert_eq!(
            RedFlag::from_identifier("Active-Bleeding"),
            Some(RedFlag::ActiveBleeding)
        );
    }

    #[test]
    fn spaced_flag_deserializes_to_its_variant() {
        let flags: Vec<RedFlag> =
            serde_json::from_str(r#"["difficulty breathing", "critical-severity"]"#).unwrap();
        assert_eq!(
            flags,
            vec![RedFlag::DifficultyBreathing, RedFlag::CriticalSeverity]
        );
    }

    #[test]
    fn parse_buckets_unknown_flags() {
        assert_eq!(RedFlag::parse("flag_0"), RedFlag::Other);
    }

    #[test]
    fn default_always_urgent_excludes_injury_flags() {
        let urgent = RedFlag::default_always_urgent();
        assert!(urgent.contains(&RedFlag::SevereChestPain));
        assert!(!urgent.contains(&RedFlag::Fracture));
        assert!(!urgent.contains(&RedFlag::Other));
    }

    #[test]
    fn deserializes_from_identifier() {
        let flag: RedFlag = serde_json::from_str("\"active_bleeding\"").unwrap();
        assert_eq!(flag, RedFlag::ActiveBleeding);
    }
}
