pub const MIN_PROMPT_CHARS: usize = 10;
pub const MAX_PROMPT_CHARS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("prompt must contain at least {min} characters (got {len})")]
    TooShort { len: usize, min: usize },
    #[error("prompt must not exceed {max} characters (got {len})")]
    TooLong { len: usize, max: usize },
}

/// Trim a user prompt and check its length in characters.
pub fn validate_prompt(prompt: &str) -> Result<&str, PromptError> {
    let trimmed = prompt.trim();
    let len = trimmed.chars().count();
    if len < MIN_PROMPT_CHARS {
        return Err(PromptError::TooShort {
            len,
            min: MIN_PROMPT_CHARS,
        });
    }
    if len > MAX_PROMPT_CHARS {
        return Err(PromptError::TooLong {
            len,
            max: MAX_PROMPT_CHARS,
        });
    }
    Ok(trimmed)
}
