use promptlens_core::AnalysisResult;

use crate::error::AnalyzeError;

/// Strip a surrounding markdown code fence, if any.
fn strip_fence(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Extract the outermost JSON object substring from raw LLM output.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse raw model output into an [`AnalysisResult`].
///
/// Tries the fence-stripped text first, then falls back to the outermost
/// `{...}` span for responses wrapped in prose.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalyzeError> {
    let stripped = strip_fence(raw);
    let first_err = match serde_json::from_str(stripped) {
        Ok(result) => return Ok(result),
        Err(e) => e,
    };

    if let Some(obj) = extract_json_object(raw) {
        if let Ok(result) = serde_json::from_str(obj) {
            return Ok(result);
        }
    }

    let preview: String = raw.chars().take(500).collect();
    tracing::warn!(error = %first_err, preview = %preview, "failed to parse model output");
    Err(AnalyzeError::Parse(first_err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "overallScore": 61,
        "technologies": [{"category": "Frontend", "primary": {"name": "React"}}],
        "architecture": [{"id": "c1", "name": "React Client", "technology": "Vue"}]
    }"#;

    #[test]
    fn plain_json() {
        let result = parse_analysis(BODY).unwrap();
        assert_eq!(result.overall_score, 61.0);
        assert_eq!(result.technologies[0].primary.name, "React");
        assert_eq!(result.architecture[0].technology, "Vue");
    }

    #[test]
    fn json_fence() {
        let raw = format!("```json\n{BODY}\n```");
        assert_eq!(parse_analysis(&raw).unwrap().overall_score, 61.0);
    }

    #[test]
    fn bare_fence() {
        let raw = format!("```\n{BODY}\n```\n");
        assert!(parse_analysis(&raw).is_ok());
    }

    #[test]
    fn prose_around_object() {
        let raw = format!("Here is the analysis you asked for:\n{BODY}\nHope it helps!");
        assert_eq!(parse_analysis(&raw).unwrap().architecture.len(), 1);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(AnalyzeError::Parse(_))
        ));
        assert!(matches!(parse_analysis("} {"), Err(AnalyzeError::Parse(_))));
    }
}
