//! clinix-triage - triage one symptom report read from stdin.
//!
//! ```text
//! echo '{"symptom_text": "crushing chest pain", "age": 58, "sex": "M"}' | clinix-triage
//! ```
//!
//! The JSON result goes to stdout and logs go to stderr. Any failure exits
//! non-zero with an error object instead of a label.

use anyhow::{bail, Context};
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use clinix_triage::adapters::{
    AnthropicConfig, AnthropicProvider, InMemoryPredictionRecorder, JsonArtifactLoader,
    KeywordSymptomParser, LlmProseGenerator, LlmSymptomParser, OpenAIConfig, OpenAIProvider,
};
use clinix_triage::application::{RunTriageCommand, RunTriageHandler, TriageError};
use clinix_triage::config::{AiConfig, AiProvider, AppConfig, LoggingConfig};
use clinix_triage::domain::explanation::ExplanationAssembler;
use clinix_triage::domain::features::FeatureEngineer;
use clinix_triage::domain::foundation::{ErrorCode, SymptomReportId};
use clinix_triage::domain::symptoms::{Demographics, Sex, StructuredSymptomRecord};
use clinix_triage::ports::{AIProvider, ModelArtifactLoader, SymptomParser};

/// Request accepted on stdin.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriageRequest {
    symptom_text: Option<String>,
    record: Option<StructuredSymptomRecord>,
    age: Option<u32>,
    sex: Option<String>,
    report_id: Option<SymptomReportId>,
}

impl TriageRequest {
    fn into_command(self) -> anyhow::Result<RunTriageCommand> {
        let demographics = Demographics {
            age: self.age,
            sex: self.sex.as_deref().map(Sex::parse),
        };
        let cmd = match (self.record, self.symptom_text) {
            (Some(record), _) => RunTriageCommand::from_record(record, demographics),
            (None, Some(text)) => RunTriageCommand::from_text(text, demographics),
            (None, None) => bail!("request needs either `symptom_text` or `record`"),
        };
        Ok(match self.report_id {
            Some(id) => cmd.with_report_id(id),
            None => cmd,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            match init_tracing(&LoggingConfig::default()) {
                Ok(()) => error!(error = %format!("{:#}", err), "fatal configuration error"),
                Err(_) => eprintln!("fatal configuration error: {:#}", err),
            }
            return report_failure(&err);
        }
    };

    if let Err(err) = init_tracing(&config.logging) {
        eprintln!("failed to initialise logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    let handler = match build_handler(&config) {
        Ok(handler) => handler,
        Err(err) => {
            error!(error = %format!("{:#}", err), "fatal configuration error");
            return report_failure(&err);
        }
    };

    match run(&handler).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{:#}", err), "triage failed");
            report_failure(&err)
        }
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(logging.env_filter()?);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

fn build_provider(ai: &AiConfig) -> anyhow::Result<Option<Arc<dyn AIProvider>>> {
    let provider: Arc<dyn AIProvider> = match ai.provider {
        AiProvider::None => return Ok(None),
        AiProvider::OpenAI => {
            let key = ai
                .openai_api_key
                .as_ref()
                .context("OpenAI selected without an API key")?;
            let config = OpenAIConfig::new(key.expose_secret().as_str())
                .with_model(ai.openai_model.as_str())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(OpenAIProvider::new(config)?)
        }
        AiProvider::Anthropic => {
            let key = ai
                .anthropic_api_key
                .as_ref()
                .context("Anthropic selected without an API key")?;
            let config = AnthropicConfig::new(key.expose_secret().as_str())
                .with_model(ai.anthropic_model.as_str())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(AnthropicProvider::new(config)?)
        }
    };
    Ok(Some(provider))
}

fn build_handler(config: &AppConfig) -> anyhow::Result<RunTriageHandler> {
    let schema_version = config.model.schema_version();
    let engineer = FeatureEngineer::new(schema_version).map_err(TriageError::from)?;
    let model = JsonArtifactLoader::new()
        .load(config.model.artifact_id(), schema_version)
        .map_err(TriageError::from)?;

    let provider = build_provider(&config.ai)?;
    let parser: Arc<dyn SymptomParser> = match &provider {
        Some(provider) => Arc::new(LlmSymptomParser::new(provider.clone())),
        None => Arc::new(KeywordSymptomParser::new()),
    };

    let mut assembler = ExplanationAssembler::new(config.triage.explanation_top_k);
    if let (Some(provider), true) = (&provider, config.ai.generate_prose) {
        assembler = assembler.with_prose(Arc::new(LlmProseGenerator::new(provider.clone())));
    }

    Ok(RunTriageHandler::new(
        parser,
        Arc::new(model),
        Arc::new(InMemoryPredictionRecorder::new()),
    )
    .with_engineer(engineer)
    .with_engine(config.triage.engine()?)
    .with_assembler(assembler))
}

async fn run(handler: &RunTriageHandler) -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;
    let request: TriageRequest =
        serde_json::from_str(&input).context("malformed triage request")?;

    let result = handler.handle(request.into_command()?).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Writes an error object to stdout; never a label.
fn report_failure(err: &anyhow::Error) -> ExitCode {
    let code = err
        .downcast_ref::<TriageError>()
        .map(TriageError::code)
        .unwrap_or(ErrorCode::InternalError);
    let body = serde_json::json!({
        "error": {
            "code": code.to_string(),
            "message": format!("{:#}", err),
        }
    });
    println!("{}", body);
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_subscriber_install_is_an_error() {
        let _ = init_tracing(&LoggingConfig::default());
        assert!(init_tracing(&LoggingConfig::default()).is_err());
    }

    #[test]
    fn request_prefers_structured_record() {
        let request: TriageRequest = serde_json::from_str(
            r#"{"symptom_text": "headache", "record": {"severity": 4}, "age": 40, "sex": "F"}"#,
        )
        .unwrap();
        let cmd = request.into_command().unwrap();

        assert!(matches!(cmd.input, clinix_triage::application::SymptomInput::Structured(_)));
        assert_eq!(cmd.demographics, Demographics::new(40, Sex::Female));
    }

    #[test]
    fn request_without_symptoms_is_rejected() {
        let request: TriageRequest = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        assert!(request.into_command().is_err());
    }

    #[test]
    fn failure_code_comes_from_triage_error() {
        let err = anyhow::Error::new(TriageError::ReportNotFound(SymptomReportId::new()))
            .context("triage failed");
        assert_eq!(
            err.downcast_ref::<TriageError>().map(TriageError::code),
            Some(ErrorCode::ReportNotFound)
        );
    }
}
