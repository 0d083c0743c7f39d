//! Keyword Symptom Parser - deterministic extraction from raw text.
//!
//! Needs no network access. Used directly when no language model is
//! configured and as the fallback when the model call or its JSON fails.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::SymptomReportId;
use crate::domain::symptoms::{
    RedFlag, StructuredSymptomRecord, SymptomCategory, SymptomDuration, SymptomPattern,
    MAX_SEVERITY,
};
use crate::ports::{ParseFailure, SymptomParser};

const BASELINE_SEVERITY: f64 = 5.0;

const FRACTURE_KEYWORDS: &[&str] = &["broken", "fracture", "cracked", "shattered", "snapped"];
const DISLOCATION_KEYWORDS: &[&str] = &[
    "dislocated",
    "out of place",
    "wrong way",
    "facing wrong",
    "misaligned",
    "popped out",
];
const TRAUMA_KEYWORDS: &[&str] = &["hit", "struck", "fell", "fall", "accident", "crash", "collision"];
const BODY_PARTS: &[&str] = &[
    "arm", "leg", "foot", "ankle", "wrist", "hand", "finger", "toe", "shoulder", "elbow", "knee",
    "hip", "rib", "spine", "neck", "back",
];

/// Narrower than `DISLOCATION_KEYWORDS`; only these raise the dislocation flag.
const DISLOCATION_PHRASES: &[&str] = &["wrong way", "facing wrong", "out of place", "dislocated"];

const BLEEDING_WORDS: &[&str] = &["bleeding", "blood", "hemorrhage"];
const UNSTOPPED_PHRASES: &[&str] = &["won't stop", "wont stop", "not stopping"];
const ONGOING_PHRASES: &[&str] = &[
    "won't stop",
    "wont stop",
    "not stopping",
    "continuing",
    "persistent",
    "heavy",
];

const CATEGORY_KEYWORDS: &[(SymptomCategory, &[&str])] = &[
    (SymptomCategory::ChestPain, &["chest", "heart", "cardiac"]),
    (
        SymptomCategory::ShortnessOfBreath,
        &["breath", "breathing", "shortness", "short of breath"],
    ),
    (SymptomCategory::Fever, &["fever", "temperature", "hot"]),
    (SymptomCategory::Headache, &["head", "headache"]),
    (
        SymptomCategory::AbdominalPain,
        &["stomach", "abdominal", "belly", "abdomen"],
    ),
    (SymptomCategory::Bleeding, BLEEDING_WORDS),
];

const FLAG_KEYWORDS: &[(RedFlag, &[&str])] = &[
    (
        RedFlag::SevereChestPain,
        &["severe chest", "crushing", "pressure", "heart pain"],
    ),
    (
        RedFlag::LossOfConsciousness,
        &["unconscious", "passed out", "fainted"],
    ),
    (
        RedFlag::DifficultyBreathing,
        &["can't breathe", "struggling to breathe", "shortness of breath"],
    ),
    (RedFlag::ActiveBleeding, BLEEDING_WORDS),
    (RedFlag::Fracture, &["broken"]),
    (RedFlag::Dislocation, DISLOCATION_PHRASES),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjuryKind {
    Fracture,
    Dislocation,
    Blunt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Injury {
    kind: InjuryKind,
    body_part: &'static str,
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Deterministic keyword parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSymptomParser;

impl KeywordSymptomParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts a record from non-empty text. Always succeeds; text with no
    /// recognised keyword yields a single `other` category at baseline
    /// severity.
    pub fn extract(&self, text: &str) -> StructuredSymptomRecord {
        let text = text.trim().to_lowercase();
        let injuries = detect_injuries(&text);

        let mut categories: Vec<SymptomCategory> = CATEGORY_KEYWORDS
            .iter()
            .filter(|(_, words)| contains_any(&text, words))
            .map(|(category, _)| *category)
            .collect();
        if !injuries.is_empty() {
            categories.push(SymptomCategory::Trauma);
        }
        if categories.is_empty() {
            categories.push(SymptomCategory::Other);
        }

        let severity = severity_spectrum(&text, &injuries);

        let mut flags: Vec<RedFlag> = FLAG_KEYWORDS
            .iter()
            .filter(|(_, words)| contains_any(&text, words))
            .map(|(flag, _)| *flag)
            .collect();
        if !injuries.is_empty() {
            flags.push(RedFlag::TraumaticInjury);
        }
        if injuries.len() >= 2 {
            flags.push(RedFlag::MultipleInjuries);
        }
        if severity >= 9.0 {
            flags.push(RedFlag::CriticalSeverity);
        }

        let (pattern, days) = if !injuries.is_empty() {
            (SymptomPattern::Acute, 1)
        } else if text.contains("worse") {
            (SymptomPattern::Progressive, 3)
        } else {
            (SymptomPattern::Constant, 3)
        };

        debug!(
            injuries = ?injuries.iter().map(|i| i.body_part).collect::<Vec<_>>(),
            severity,
            flags = flags.len(),
            "keyword extraction"
        );

        StructuredSymptomRecord::new(severity)
            .with_categories(categories)
            .with_red_flags(flags)
            .with_pattern(pattern)
            .with_duration(SymptomDuration::from_days(days))
    }
}

#[async_trait]
impl SymptomParser for KeywordSymptomParser {
    async fn parse(
        &self,
        _report_id: SymptomReportId,
        text: &str,
    ) -> Result<StructuredSymptomRecord, ParseFailure> {
        if text.trim().is_empty() {
            return Err(ParseFailure::EmptyText);
        }
        Ok(self.extract(text))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// One injury per mentioned body part; the strongest mechanism wins.
fn detect_injuries(text: &str) -> Vec<Injury> {
    let kind = if contains_any(text, FRACTURE_KEYWORDS) {
        Some(InjuryKind::Fracture)
    } else if contains_any(text, DISLOCATION_KEYWORDS) {
        Some(InjuryKind::Dislocation)
    } else if contains_any(text, TRAUMA_KEYWORDS) {
        Some(InjuryKind::Blunt)
    } else {
        None
    };

    match kind {
        Some(kind) => BODY_PARTS
            .iter()
            .filter(|part| text.contains(*part))
            .map(|part| Injury {
                kind,
                body_part: *part,
            })
            .collect(),
        None => Vec::new(),
    }
}

fn injury_floor(text: &str, injuries: &[Injury]) -> f64 {
    let mut floor = injuries
        .iter()
        .map(|injury| match injury.kind {
            InjuryKind::Fracture => 8.5,
            InjuryKind::Dislocation => 8.0,
            InjuryKind::Blunt => 7.0,
        })
        .fold(0.0, f64::max);
    if text.contains("broken") {
        floor = floor.max(8.5);
    }
    if contains_any(text, DISLOCATION_KEYWORDS) {
        floor = floor.max(8.0);
    }
    floor
}

/// Maps intensity words onto the 0..=10 severity scale.
fn severity_spectrum(text: &str, injuries: &[Injury]) -> f64 {
    let mentions_bleeding = text.contains("bleeding") || text.contains("blood");
    let unstopped = contains_any(text, UNSTOPPED_PHRASES);
    let significant = text.contains("significant");

    let mut severity = BASELINE_SEVERITY.max(injury_floor(text, injuries));

    if contains_any(text, &["dying", "death", "dead", "kill me"]) {
        severity = MAX_SEVERITY;
    } else if contains_any(
        text,
        &["severe", "extreme", "intense", "unbearable", "critical", "emergency"],
    ) {
        severity = severity.max(9.0);
    } else if contains_any(text, &["very bad", "really bad", "terrible", "awful"]) {
        severity = severity.max(8.0);
    } else if significant {
        severity = if mentions_bleeding && unstopped { 6.8 } else { 6.5 };
    } else if contains_any(text, &["bad", "moderate"]) {
        severity = severity.max(6.5);
    } else if contains_any(text, &["mild", "slight", "minor", "little"]) {
        severity = severity.min(4.0);
    }

    if mentions_bleeding
        && contains_any(text, ONGOING_PHRASES)
        && !significant
        && !text.contains("severe")
    {
        severity = severity.max(7.0);
    }

    if injuries.len() >= 2 {
        severity = severity.max(8.5);
    }
    if text.contains("broken") && contains_any(text, &["arm", "leg", "foot"]) {
        severity = severity.max(8.5);
    }
    if contains_any(text, DISLOCATION_PHRASES) {
        severity = severity.max(8.0);
    }

    // "significant bleeding" pins the score regardless of other wording.
    if significant && mentions_bleeding {
        if unstopped {
            severity = 6.8;
        } else if severity < 6.5 {
            severity = 6.5;
        }
    }

    severity.min(MAX_SEVERITY)
}
