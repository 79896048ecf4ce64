pub mod engine;
mod error;
mod parse;
mod prompt;

pub use error::AnalyzeError;
pub use parse::parse_analysis;

use promptlens_core::{AiSettings, AnalysisResult, ReconciliationOutcome};

/// Analyze a prompt end to end: validate, ask the model, parse, and
/// reconcile the architecture against the recommended stack.
pub async fn analyze(
    prompt: &str,
    settings: &AiSettings,
) -> Result<ReconciliationOutcome, AnalyzeError> {
    let trimmed = promptlens_core::validate_prompt(prompt)?;
    if !promptlens_core::ai_configured(settings) {
        return Err(AnalyzeError::NotConfigured);
    }

    let system = prompt::system_prompt();
    let user_msg = prompt::user_message(trimmed);

    tracing::info!(
        provider = %settings.provider,
        model = %settings.model,
        len = trimmed.chars().count(),
        "analyzing prompt"
    );

    let raw = engine::generate(settings, &system, &user_msg)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "generate failed"))?;
    tracing::debug!(raw = %raw, "raw model output");

    let result = parse::parse_analysis(&raw)?;
    Ok(finish(result))
}

/// Post-process a parsed result: fill in a missing architecture from the
/// stack, then reconcile.
pub fn finish(mut result: AnalysisResult) -> ReconciliationOutcome {
    if result.architecture.is_empty() && !result.technologies.is_empty() {
        result.architecture = promptlens_core::derive_architecture(&result.technologies);
        tracing::debug!(
            components = result.architecture.len(),
            "derived architecture from technology stack"
        );
    }

    let outcome = promptlens_core::reconcile(result);
    if !outcome.is_synced {
        tracing::info!(corrections = ?outcome.corrections, "architecture was synced with tech stack");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finish_derives_missing_architecture() {
        let raw = r#"{"technologies": [
            {"category": "Frontend", "primary": {"name": "React"}},
            {"category": "Backend", "primary": {"name": "Express"}}
        ]}"#;
        let outcome = finish(parse_analysis(raw).unwrap());
        assert!(outcome.is_synced);
        let techs: Vec<&str> = outcome
            .result
            .architecture
            .iter()
            .map(|c| c.technology.as_str())
            .collect();
        assert_eq!(techs, vec!["React", "Express"]);
    }

    #[test]
    fn finish_reconciles_model_architecture() {
        let raw = r#"```json
{"technologies": [{"category": "Database", "primary": {"name": "PostgreSQL"}}],
 "architecture": [{"id": "db", "name": "Data Store", "technology": "MySQL"}]}
```"#;
        let outcome = finish(parse_analysis(raw).unwrap());
        assert!(!outcome.is_synced);
        assert_eq!(
            outcome.corrections,
            vec!["Data Store: \"MySQL\" → \"PostgreSQL\""]
        );
    }

    #[tokio::test]
    async fn analyze_rejects_short_prompt_before_calling_out() {
        let err = analyze("todo", &AiSettings::default()).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidPrompt(_)));
    }

    #[tokio::test]
    async fn analyze_requires_configuration() {
        let err = analyze("A marketplace for local artisans", &AiSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::NotConfigured));
    }
}
