//! Explanation Assembler - decision outcome → TriageDecision.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::factor::ContributingFactor;
use crate::domain::features::red_flag_for_field;
use crate::domain::risk::FeatureContribution;
use crate::domain::symptoms::{ParseConfidence, RedFlag, StructuredSymptomRecord};
use crate::domain::triage::{DecisionBasis, TriageDecision, TriageOutcome};
use crate::ports::{ProseGenerator, ProseRequest};

/// Number of factors surfaced when not configured.
pub const DEFAULT_TOP_K: usize = 5;

const HIGH_SEVERITY: f64 = 8.0;
const MODERATE_SEVERITY: f64 = 6.0;

/// Where the explanation wording came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExplanationSource {
    Generated,
    Templated,
    Degraded { reason: String },
}

/// Prose generation failed; the templated explanation was used instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("explanation degraded to template: {reason}")]
pub struct ExplanationDegraded {
    pub reason: String,
}

impl ExplanationDegraded {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct ExplanationAssembler {
    top_k: usize,
    prose: Option<Arc<dyn ProseGenerator>>,
}

impl ExplanationAssembler {
    pub fn new(top_k: usize) -> Self {
        Self { top_k, prose: None }
    }

    /// Delegates final wording to `prose`.
    pub fn with_prose(mut self, prose: Arc<dyn ProseGenerator>) -> Self {
        self.prose = Some(prose);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Picks the factors to surface.
    ///
    /// Flags that forced a safety override come first, then the remaining
    /// red flags in vocabulary order, then non-zero contributions by
    /// descending magnitude with ties kept in schema order. Red flag
    /// indicator fields are not repeated as weighted factors.
    pub fn select_factors(
        &self,
        record: &StructuredSymptomRecord,
        basis: &DecisionBasis,
        contributions: &[FeatureContribution],
    ) -> Vec<ContributingFactor> {
        let triggering: &[RedFlag] = match basis {
            DecisionBasis::SafetyOverride { flags } => flags,
            DecisionBasis::Threshold => &[],
        };
        let flags = triggering.iter().copied().chain(
            record
                .red_flags()
                .iter()
                .copied()
                .filter(|flag| !triggering.contains(flag)),
        );

        let mut weighted: Vec<&FeatureContribution> = contributions
            .iter()
            .filter(|c| c.contribution != 0.0 && c.contribution.is_finite())
            .filter(|c| red_flag_for_field(&c.feature).is_none())
            .collect();
        // stable sort keeps schema order among equal magnitudes
        weighted.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        let factors: Vec<ContributingFactor> = flags
            .map(ContributingFactor::red_flag)
            .chain(
                weighted
                    .into_iter()
                    .map(|c| ContributingFactor::weighted(c.feature.clone(), c.contribution)),
            )
            .take(self.top_k)
            .collect();

        debug!(
            selected = factors.len(),
            top_k = self.top_k,
            "selected contributing factors"
        );
        factors
    }

    /// Builds the decision. Never fails: prose problems degrade to the
    /// templated explanation.
    pub async fn explain(
        &self,
        outcome: &TriageOutcome,
        record: &StructuredSymptomRecord,
        contributions: &[FeatureContribution],
    ) -> TriageDecision {
        let factors = self.select_factors(record, &outcome.basis, contributions);
        let templated = templated_explanation(outcome, record);

        let (explanation_text, explanation_source) = match &self.prose {
            None => (templated, ExplanationSource::Templated),
            Some(generator) => {
                let request = ProseRequest {
                    label: outcome.label,
                    score: outcome.score,
                    basis: outcome.basis.clone(),
                    severity: record.severity(),
                    factors: factors.clone(),
                    templated: templated.clone(),
                };
                match generate(generator.as_ref(), &request).await {
                    Ok(text) => (text, ExplanationSource::Generated),
                    Err(degraded) => {
                        warn!(reason = %degraded.reason, "prose generation failed, using template");
                        (
                            templated,
                            ExplanationSource::Degraded {
                                reason: degraded.reason,
                            },
                        )
                    }
                }
            }
        };

        TriageDecision {
            label: outcome.label,
            category_text: outcome.label.category_text().to_string(),
            risk_score: outcome.score,
            basis: outcome.basis.clone(),
            borderline: outcome.is_borderline(),
            explanation_text,
            explanation_source,
            contributing_factors: factors,
        }
    }
}

impl Default for ExplanationAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

async fn generate(
    generator: &dyn ProseGenerator,
    request: &ProseRequest,
) -> Result<String, ExplanationDegraded> {
    let text = generator
        .generate(request)
        .await
        .map_err(|e| ExplanationDegraded::new(e.to_string()))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ExplanationDegraded::new("prose generator returned no text"));
    }
    Ok(text.to_string())
}

fn join_flags<'a>(flags: impl IntoIterator<Item = &'a RedFlag>) -> String {
    flags
        .into_iter()
        .map(|f| f.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deterministic, always non-empty explanation.
pub fn templated_explanation(outcome: &TriageOutcome, record: &StructuredSymptomRecord) -> String {
    let mut text = format!(
        "This case is classified as {} based on a risk score of {:.2}%.",
        outcome.label,
        outcome.score.value() * 100.0
    );

    if let DecisionBasis::SafetyOverride { flags } = &outcome.basis {
        text.push_str(&format!(
            " Urgent care is required because of: {}.",
            join_flags(flags)
        ));
    }

    if !record.red_flags().is_empty() {
        text.push_str(&format!(
            " Red flags detected: {}.",
            join_flags(record.red_flags())
        ));
    }

    let severity = record.severity();
    if severity >= HIGH_SEVERITY {
        text.push_str(&format!(
            " High symptom severity ({:.1}/10) indicates urgent medical evaluation may be needed.",
            severity
        ));
    } else if severity >= MODERATE_SEVERITY {
        text.push_str(&format!(
            " Moderate to high severity ({:.1}/10) suggests consultation with a healthcare provider.",
            severity
        ));
    }

    if record.confidence() == ParseConfidence::LowConfidence {
        text.push_str(" The symptom description could not be interpreted with confidence.");
    }

    text.push_str(&format!(" Recommendation: {}.", outcome.label.category_text()));
    text
}
