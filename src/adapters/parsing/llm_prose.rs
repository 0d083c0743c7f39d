//! LLM Prose Generator - explanation wording through an `AIProvider`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::explanation::FactorSignal;
use crate::ports::{
    AIProvider, CompletionPurpose, CompletionRequest, MessageRole, ProseError, ProseGenerator,
    ProseRequest, RequestMetadata,
};

const EXPLANATION_PROMPT: &str = "You are a medical assistant providing a brief, clear explanation of a triage decision.

Given:
- Risk score: {risk_score} (0-1 scale, where 1 is highest risk)
- Triage category: {triage_label}
- Parsed symptoms: {parsed_symptoms}
- Red flags detected: {red_flags}

Provide a concise explanation (2-3 sentences) explaining why this case was classified as {triage_label}.
Focus on the key factors: symptom severity, red flags, and risk level.
Do not change the triage category.

Explanation:";

const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_MAX_TOKENS: u32 = 200;

pub struct LlmProseGenerator {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmProseGenerator {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn render_prompt(request: &ProseRequest) -> String {
        let red_flags: Vec<&str> = request
            .factors
            .iter()
            .filter_map(|factor| match &factor.signal {
                FactorSignal::RedFlag { flag } => Some(flag.as_str()),
                FactorSignal::Weight { .. } => None,
            })
            .collect();
        let weighted: Vec<&str> = request
            .factors
            .iter()
            .filter(|factor| !factor.is_red_flag())
            .map(|factor| factor.feature.as_str())
            .collect();
        let parsed_symptoms = serde_json::json!({
            "severity": request.severity,
            "contributing_features": weighted,
        });

        EXPLANATION_PROMPT
            .replace("{risk_score}", &format!("{:.3}", request.score.value()))
            .replace("{triage_label}", request.label.as_str())
            .replace("{parsed_symptoms}", &parsed_symptoms.to_string())
            .replace(
                "{red_flags}",
                &serde_json::Value::from(red_flags).to_string(),
            )
    }
}

#[async_trait]
impl ProseGenerator for LlmProseGenerator {
    async fn generate(&self, request: &ProseRequest) -> Result<String, ProseError> {
        let completion = CompletionRequest::new(
            CompletionPurpose::Explanation,
            RequestMetadata::new(format!("explain-{}", request.label)),
        )
        .with_message(MessageRole::User, Self::render_prompt(request))
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self.provider.complete(completion).await?;
        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::explanation::ContributingFactor;
    use crate::domain::risk::RiskScore;
    use crate::domain::symptoms::RedFlag;
    use crate::domain::triage::{DecisionBasis, TriageLabel};
    use crate::ports::AIError;

    fn request() -> ProseRequest {
        ProseRequest {
            label: TriageLabel::Urgent,
            score: RiskScore::try_new(0.91).unwrap(),
            basis: DecisionBasis::SafetyOverride {
                flags: vec![RedFlag::SevereChestPain],
            },
            severity: 8.0,
            factors: vec![
                ContributingFactor::red_flag(RedFlag::SevereChestPain),
                ContributingFactor::weighted("normalized_severity", 3.2),
            ],
            templated: "template".to_string(),
        }
    }

    #[test]
    fn prompt_includes_decision_facts() {
        let prompt = LlmProseGenerator::render_prompt(&request());

        assert!(prompt.contains("Risk score: 0.910"));
        assert!(prompt.contains("Triage category: urgent"));
        assert!(prompt.contains(r#"["severe_chest_pain"]"#));
        assert!(prompt.contains("normalized_severity"));
        assert!(!prompt.contains("{triage_label}"));
    }

    #[tokio::test]
    async fn returns_trimmed_completion() {
        let provider = MockAIProvider::new().with_response("  Chest pain needs care now.\n");
        let generator = LlmProseGenerator::new(Arc::new(provider.clone()));

        let text = generator.generate(&request()).await.unwrap();

        assert_eq!(text, "Chest pain needs care now.");
        assert_eq!(provider.get_calls()[0].purpose, CompletionPurpose::Explanation);
        assert_eq!(provider.get_calls()[0].max_tokens, Some(DEFAULT_MAX_TOKENS));
    }

    #[tokio::test]
    async fn provider_errors_surface() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 30 });
        let generator = LlmProseGenerator::new(Arc::new(provider));

        let err = generator.generate(&request()).await.unwrap_err();
        assert_eq!(err, ProseError::Provider(AIError::Timeout { timeout_secs: 30 }));
    }
}
