use std::time::Duration;

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use serde::Deserialize;

use promptlens_core::AiSettings;

use crate::error::AnalyzeError;

const TEMPERATURE: f32 = 0.7;

fn map_backend(provider: &str) -> Result<LLMBackend, AnalyzeError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(AnalyzeError::UnknownProvider(other.to_string())),
    }
}

/// Send one system + user exchange and return the model's text, bounded by
/// the configured timeout.
pub async fn generate(
    settings: &AiSettings,
    system: &str,
    user_msg: &str,
) -> Result<String, AnalyzeError> {
    let secs = settings.timeout_secs();
    let call = async {
        if settings.provider == "gateway" {
            generate_gateway(settings, system, user_msg).await
        } else {
            generate_llm(settings, system, user_msg).await
        }
    };
    let text = tokio::time::timeout(Duration::from_secs(secs), call)
        .await
        .map_err(|_| AnalyzeError::Timeout(secs))??;

    if text.trim().is_empty() {
        return Err(AnalyzeError::EmptyResponse);
    }
    Ok(text)
}

async fn generate_llm(
    settings: &AiSettings,
    system: &str,
    user_msg: &str,
) -> Result<String, AnalyzeError> {
    let backend = map_backend(&settings.provider)?;

    let mut builder = LLMBuilder::new()
        .backend(backend)
        .model(&settings.model)
        .temperature(TEMPERATURE)
        .system(system);

    if !settings.api_key.is_empty() {
        builder = builder.api_key(&settings.api_key);
    }
    if let Some(url) = &settings.base_url {
        builder = builder.base_url(url);
    }

    let llm = builder
        .build()
        .map_err(|e| AnalyzeError::Provider(format!("build LLM: {e}")))?;

    let messages = vec![ChatMessage::user().content(user_msg).build()];

    let response = llm
        .chat(&messages)
        .await
        .map_err(|e| AnalyzeError::Provider(format!("chat: {e}")))?;

    response.text().ok_or(AnalyzeError::EmptyResponse)
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// OpenAI-compatible `chat/completions` endpoint behind a hosted gateway.
async fn generate_gateway(
    settings: &AiSettings,
    system: &str,
    user_msg: &str,
) -> Result<String, AnalyzeError> {
    let base = settings
        .base_url
        .as_deref()
        .ok_or(AnalyzeError::MissingBaseUrl)?;
    let url = format!("{}/chat/completions", base.trim_end_matches('/'));

    let body = serde_json::json!({
        "model": settings.model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user_msg },
        ],
        "temperature": TEMPERATURE,
    });

    let response = reqwest::Client::new()
        .post(&url)
        .bearer_auth(&settings.api_key)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %text, "AI gateway error");
        return Err(status_error(status.as_u16(), text));
    }

    let parsed: CompletionResponse = response.json().await?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or(AnalyzeError::EmptyResponse)
}

fn status_error(status: u16, body: String) -> AnalyzeError {
    match status {
        429 => AnalyzeError::RateLimited,
        402 => AnalyzeError::CreditsExhausted,
        _ => AnalyzeError::Gateway { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_map() {
        for p in ["openai", "anthropic", "google", "ollama", "groq", "mistral", "deepseek"] {
            assert!(map_backend(p).is_ok(), "{p}");
        }
        assert!(matches!(
            map_backend("cohere"),
            Err(AnalyzeError::UnknownProvider(p)) if p == "cohere"
        ));
    }

    #[test]
    fn gateway_status_codes() {
        assert!(matches!(status_error(429, String::new()), AnalyzeError::RateLimited));
        assert!(matches!(status_error(402, String::new()), AnalyzeError::CreditsExhausted));
        assert!(matches!(
            status_error(500, "boom".into()),
            AnalyzeError::Gateway { status: 500, .. }
        ));
    }

    #[test]
    fn completion_content_extraction() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{}"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices.into_iter().next().and_then(|c| c.message).and_then(|m| m.content);
        assert_eq!(content.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn gateway_without_base_url_fails_fast() {
        let settings = AiSettings {
            provider: "gateway".into(),
            api_key: "k".into(),
            model: "m".into(),
            ..Default::default()
        };
        let err = generate(&settings, "sys", "user").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingBaseUrl));
    }
}
