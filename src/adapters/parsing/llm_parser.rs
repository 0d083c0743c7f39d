//! LLM Symptom Parser - prompted JSON extraction through an `AIProvider`.
//!
//! The model is asked for the record's wire shape. Anything that goes wrong
//! on the way (provider error, no JSON, invalid record) falls back to the
//! keyword parser, so a provider outage never blocks a prediction.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::KeywordSymptomParser;
use crate::domain::foundation::SymptomReportId;
use crate::domain::symptoms::StructuredSymptomRecord;
use crate::ports::{
    AIProvider, CompletionPurpose, CompletionRequest, MessageRole, ParseFailure, RequestMetadata,
    SymptomParser,
};

pub const SYMPTOM_PARSING_SYSTEM_PROMPT: &str =
    "You are a medical assistant that returns only valid JSON.";

const SYMPTOM_PARSING_PROMPT: &str = r#"You are a medical assistant that parses patient symptom descriptions into structured data.

Given the following symptom description, extract and return a JSON object with the following structure:
{
    "symptom_categories": ["category1", "category2", ...],
    "severity": <number between 0-10>,
    "duration_days": <number>,
    "pattern": "intermittent" | "progressive" | "constant" | "acute",
    "red_flags": ["flag1", "flag2", ...]
}

Symptom categories should be standardized medical terms (e.g., "chest_pain", "shortness_of_breath", "fever", "headache").
Red flags are concerning symptoms that may indicate serious conditions (e.g., "severe_chest_pain", "loss_of_consciousness", "difficulty_breathing").

Symptom description:
{symptom_text}

Return ONLY valid JSON, no additional text."#;

/// Models report 0 when they could not judge severity.
const UNKNOWN_SEVERITY: f64 = 5.0;

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 500;

/// Symptom parser backed by a language model.
pub struct LlmSymptomParser {
    provider: Arc<dyn AIProvider>,
    fallback: KeywordSymptomParser,
    temperature: f32,
    max_tokens: u32,
}

impl LlmSymptomParser {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            fallback: KeywordSymptomParser::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_request(&self, report_id: SymptomReportId, text: &str) -> CompletionRequest {
        CompletionRequest::new(
            CompletionPurpose::SymptomParsing,
            RequestMetadata::for_report(report_id),
        )
        .with_system_prompt(SYMPTOM_PARSING_SYSTEM_PROMPT)
        .with_message(
            MessageRole::User,
            SYMPTOM_PARSING_PROMPT.replace("{symptom_text}", text),
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens)
    }

    async fn ask_model(
        &self,
        report_id: SymptomReportId,
        text: &str,
    ) -> Result<StructuredSymptomRecord, ParseFailure> {
        let response = self
            .provider
            .complete(self.build_request(report_id, text))
            .await?;

        let json = extract_json_object(&response.content)
            .ok_or_else(|| ParseFailure::Malformed("no JSON object in response".to_string()))?;
        let record: StructuredSymptomRecord =
            serde_json::from_str(json).map_err(|e| ParseFailure::Malformed(e.to_string()))?;

        let record = if record.severity() == 0.0 {
            record.with_severity(UNKNOWN_SEVERITY)
        } else {
            record
        };
        record
            .validate()
            .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

        debug!(
            %report_id,
            model = %response.model,
            categories = record.categories().len(),
            red_flags = record.red_flags().len(),
            "language model parse"
        );
        Ok(record)
    }
}

#[async_trait]
impl SymptomParser for LlmSymptomParser {
    async fn parse(
        &self,
        report_id: SymptomReportId,
        text: &str,
    ) -> Result<StructuredSymptomRecord, ParseFailure> {
        if text.trim().is_empty() {
            return Err(ParseFailure::EmptyText);
        }

        match self.ask_model(report_id, text).await {
            Ok(record) => Ok(record),
            Err(failure) => {
                warn!(
                    %report_id,
                    provider = %self.provider.provider_info().name,
                    error = %failure,
                    "language model parse failed, using keyword parser"
                );
                self.fallback.parse(report_id, text).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Finds the JSON object in a response that may wrap it in prose or a
/// markdown code block.
fn extract_json_object(response: &str) -> Option<&str> {
    let trimmed = response.trim();

    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let body = &trimmed[start + fence.len()..];
            if let Some(end) = body.find("```") {
                return balanced_object(body[..end].trim());
            }
        }
    }

    balanced_object(trimmed)
}

fn balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
