use promptlens_core::PromptError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    InvalidPrompt(#[from] PromptError),

    #[error("AI provider is not configured")]
    NotConfigured,

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("gateway provider requires a base URL")]
    MissingBaseUrl,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("rate limit exceeded, try again in a moment")]
    RateLimited,

    #[error("AI credits exhausted")]
    CreditsExhausted,

    #[error("gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("analysis timed out after {0}s")]
    Timeout(u64),

    #[error("model returned no analysis")]
    EmptyResponse,

    #[error("failed to parse analysis result: {0}")]
    Parse(String),
}

impl AnalyzeError {
    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalyzeError::RateLimited | AnalyzeError::Timeout(_) | AnalyzeError::Network(_)
        )
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzeError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_variants() {
        assert!(AnalyzeError::RateLimited.is_retryable());
        assert!(AnalyzeError::Timeout(55).is_retryable());
        assert!(!AnalyzeError::CreditsExhausted.is_retryable());
        assert!(!AnalyzeError::Parse("eof".into()).is_retryable());
    }

    #[test]
    fn display() {
        assert_eq!(
            AnalyzeError::Timeout(55).to_string(),
            "analysis timed out after 55s"
        );
        let err: AnalyzeError = PromptError::TooShort { len: 3, min: 10 }.into();
        assert_eq!(
            err.to_string(),
            "prompt must contain at least 10 characters (got 3)"
        );
    }
}
