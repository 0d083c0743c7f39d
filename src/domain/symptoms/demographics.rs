//! Patient demographics supplied by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Upper bound accepted for a patient age.
pub const MAX_AGE_YEARS: u32 = 130;

/// Administrative sex, small fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    /// Accepts `M`/`male`/`F`/`female` in any case; anything else is `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Sex::Male,
            "f" | "female" => Sex::Female,
            _ => Sex::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl From<String> for Sex {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Age and sex of the patient. Both are optional; the feature engineer
/// substitutes documented sentinels for missing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
}

impl Demographics {
    pub fn new(age: u32, sex: Sex) -> Self {
        Self {
            age: Some(age),
            sex: Some(sex),
        }
    }

    /// Nothing known about the patient.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Checks the age bound.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(age) = self.age {
            if age > MAX_AGE_YEARS {
                return Err(ValidationError::out_of_range(
                    "age",
                    0.0,
                    f64::from(MAX_AGE_YEARS),
                    f64::from(age),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_parse_accepts_short_codes() {
        assert_eq!(Sex::parse("M"), Sex::Male);
        assert_eq!(Sex::parse("female"), Sex::Female);
        assert_eq!(Sex::parse("x"), Sex::Other);
    }

    #[test]
    fn validate_rejects_implausible_age() {
        let demographics = Demographics::new(200, Sex::Female);
        assert!(matches!(
            demographics.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn validate_accepts_missing_age() {
        assert!(Demographics::unknown().validate().is_ok());
    }

    #[test]
    fn deserializes_short_sex_code() {
        let demographics: Demographics = serde_json::from_str(r#"{"age": 35, "sex": "M"}"#).unwrap();
        assert_eq!(demographics, Demographics::new(35, Sex::Male));
    }
}
