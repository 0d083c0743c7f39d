//! Closed vocabulary of symptom categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symptom categories known to feature schema v1.
///
/// Declaration order is the one-hot order of the `symptom_*` features.
/// Adding a variant changes the feature layout and requires a schema bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SymptomCategory {
    ChestPain,
    ShortnessOfBreath,
    Fever,
    Headache,
    AbdominalPain,
    Nausea,
    Dizziness,
    Fatigue,
    Bleeding,
    Trauma,
    Other,
}

impl SymptomCategory {
    /// Returns all categories in schema order.
    pub fn all() -> &'static [SymptomCategory] {
        &[
            SymptomCategory::ChestPain,
            SymptomCategory::ShortnessOfBreath,
            SymptomCategory::Fever,
            SymptomCategory::Headache,
            SymptomCategory::AbdominalPain,
            SymptomCategory::Nausea,
            SymptomCategory::Dizziness,
            SymptomCategory::Fatigue,
            SymptomCategory::Bleeding,
            SymptomCategory::Trauma,
            SymptomCategory::Other,
        ]
    }

    /// Position of this category in the schema order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Canonical snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymptomCategory::ChestPain => "chest_pain",
            SymptomCategory::ShortnessOfBreath => "shortness_of_breath",
            SymptomCategory::Fever => "fever",
            SymptomCategory::Headache => "headache",
            SymptomCategory::AbdominalPain => "abdominal_pain",
            SymptomCategory::Nausea => "nausea",
            SymptomCategory::Dizziness => "dizziness",
            SymptomCategory::Fatigue => "fatigue",
            SymptomCategory::Bleeding => "bleeding",
            SymptomCategory::Trauma => "trauma",
            SymptomCategory::Other => "other",
        }
    }

    /// Human readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            SymptomCategory::ChestPain => "Chest pain",
            SymptomCategory::ShortnessOfBreath => "Shortness of breath",
            SymptomCategory::Fever => "Fever",
            SymptomCategory::Headache => "Headache",
            SymptomCategory::AbdominalPain => "Abdominal pain",
            SymptomCategory::Nausea => "Nausea",
            SymptomCategory::Dizziness => "Dizziness",
            SymptomCategory::Fatigue => "Fatigue",
            SymptomCategory::Bleeding => "Bleeding",
            SymptomCategory::Trauma => "Trauma",
            SymptomCategory::Other => "Other symptom",
        }
    }

    /// Maps a free-form identifier onto the vocabulary.
    ///
    /// Total: anything unrecognised lands in [`SymptomCategory::Other`].
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");

        if normalized.starts_with("fracture_")
            || normalized.starts_with("dislocation_")
            || normalized.starts_with("trauma_")
        {
            return SymptomCategory::Trauma;
        }

        match normalized.as_str() {
            "chest_pain" | "chest_discomfort" => SymptomCategory::ChestPain,
            "shortness_of_breath" | "dyspnea" | "dyspnoea" | "difficulty_breathing"
            | "breathlessness" => SymptomCategory::ShortnessOfBreath,
            "fever" | "pyrexia" => SymptomCategory::Fever,
            "headache" | "migraine" => SymptomCategory::Headache,
            "abdominal_pain" | "stomach_pain" | "stomach_ache" => SymptomCategory::AbdominalPain,
            "nausea" | "vomiting" => SymptomCategory::Nausea,
            "dizziness" | "vertigo" => SymptomCategory::Dizziness,
            "fatigue" | "tiredness" => SymptomCategory::Fatigue,
            "bleeding" | "hemorrhage" | "haemorrhage" => SymptomCategory::Bleeding,
            "trauma" | "injury" => SymptomCategory::Trauma,
            _ => SymptomCategory::Other,
        }
    }
}

impl From<String> for SymptomCategory {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for SymptomCategory {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for SymptomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, category) in SymptomCategory::all().iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn other_is_last_bucket() {
        assert_eq!(SymptomCategory::all().last(), Some(&SymptomCategory::Other));
    }

    #[test]
    fn parse_accepts_canonical_names() {
        for category in SymptomCategory::all() {
            assert_eq!(SymptomCategory::parse(category.as_str()), *category);
        }
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(SymptomCategory::parse("dyspnea"), SymptomCategory::ShortnessOfBreath);
        assert_eq!(SymptomCategory::parse("Stomach Pain"), SymptomCategory::AbdominalPain);
        assert_eq!(SymptomCategory::parse("fracture_arm"), SymptomCategory::Trauma);
        assert_eq!(SymptomCategory::parse("dislocation_ankle"), SymptomCategory::Trauma);
    }

    #[test]
    fn parse_maps_unknown_to_other() {
        assert_eq!(SymptomCategory::parse("general_discomfort"), SymptomCategory::Other);
        assert_eq!(SymptomCategory::parse(""), SymptomCategory::Other);
    }

    #[test]
    fn deserializes_unknown_without_error() {
        let parsed: Vec<SymptomCategory> =
            serde_json::from_str(r#"["chest_pain", "dyspnea", "itchy_elbow"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                SymptomCategory::ChestPain,
                SymptomCategory::ShortnessOfBreath,
                SymptomCategory::Other
            ]
        );
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SymptomCategory::ShortnessOfBreath).unwrap();
        assert_eq!(json, "\"shortness_of_breath\"");
    }
}
