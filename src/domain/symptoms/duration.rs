//! Symptom duration: a day count, a bounded description, or both.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Maximum length of a free-form duration description.
pub const MAX_DURATION_DESCRIPTION: usize = 120;

/// How long the symptom has been present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomDuration {
    days: Option<u32>,
    description: Option<String>,
}

impl SymptomDuration {
    /// Duration not reported.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Duration given as whole days.
    pub fn from_days(days: u32) -> Self {
        Self {
            days: Some(days),
            description: None,
        }
    }

    /// Duration given as free text, e.g. "2 weeks" or "since yesterday".
    ///
    /// Recognised "<n> <unit>" phrases are converted to days; anything else is
    /// kept as description only.
    pub fn describe(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let trimmed = text.trim();
        let length = trimmed.chars().count();
        if length > MAX_DURATION_DESCRIPTION {
            return Err(ValidationError::too_long(
                "duration",
                MAX_DURATION_DESCRIPTION,
                length,
            ));
        }
        if trimmed.is_empty() {
            return Ok(Self::unknown());
        }

        Ok(Self {
            days: parse_days(trimmed),
            description: Some(trimmed.to_string()),
        })
    }

    /// Replaces the day count, keeping any description.
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    /// Day count, when known.
    pub fn days(&self) -> Option<u32> {
        self.days
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_unknown(&self) -> bool {
        self.days.is_none()
    }
}

fn parse_days(text: &str) -> Option<u32> {
    let lowered = text.to_ascii_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    tokens.windows(2).find_map(|pair| {
        let amount = match pair[0] {
            "a" | "an" | "one" => 1,
            "two" => 2,
            "three" => 3,
            "few" | "several" => 3,
            number => number.parse::<u32>().ok()?,
        };
        let unit = pair[1].trim_end_matches('s');
        let days = match unit {
            "hour" | "hr" => return Some(1),
            "day" => amount,
            "week" | "wk" => amount.saturating_mul(7),
            "month" => amount.saturating_mul(30),
            "year" => amount.saturating_mul(365),
            _ => return None,
        };
        Some(days)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_parses_days() {
        assert_eq!(SymptomDuration::describe("3 days").unwrap().days(), Some(3));
        assert_eq!(SymptomDuration::describe("2 weeks").unwrap().days(), Some(14));
        assert_eq!(SymptomDuration::describe("a month").unwrap().days(), Some(30));
    }

    #[test]
    fn describe_rounds_hours_up_to_one_day() {
        assert_eq!(SymptomDuration::describe("5 hours").unwrap().days(), Some(1));
    }

    #[test]
    fn describe_keeps_unparseable_text() {
        let duration = SymptomDuration::describe("since the party").unwrap();
        assert_eq!(duration.days(), None);
        assert_eq!(duration.description(), Some("since the party"));
    }

    #[test]
    fn describe_rejects_overlong_text() {
        let long = "x".repeat(MAX_DURATION_DESCRIPTION + 1);
        assert!(matches!(
            SymptomDuration::describe(long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn blank_description_is_unknown() {
        assert!(SymptomDuration::describe("   ").unwrap().is_unknown());
    }
}
