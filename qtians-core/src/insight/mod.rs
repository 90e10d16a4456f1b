//! AI insight collaborator boundary.
//!
//! The workflow never depends on a concrete AI backend; it talks to an
//! [`InsightClient`]. Any response that is empty or not a complete
//! [`AiInsight`] is a hard error; no partial insight is synthesized.

mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::AiInsight;

pub use gemini::{GeminiInsightClient, DEFAULT_GEMINI_MODEL};

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("AI insight not configured. Set insight.api_key in the config file or QT_INSIGHT_API_KEY.")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Transport(String),

    #[error("AI service returned status {0}: {1}")]
    Status(u16, String),

    #[error("AI response text is empty")]
    EmptyResponse,

    #[error("Invalid AI response format: {0}")]
    InvalidFormat(String),
}

pub type InsightResult<T> = Result<T, InsightError>;

/// Turns reflection text into pastoral feedback.
#[async_trait]
pub trait InsightClient: Send + Sync {
    async fn generate(&self, reflection: &str) -> InsightResult<AiInsight>;
}

/// Parses the JSON text an AI backend produced into an insight.
pub fn parse_insight(text: &str) -> InsightResult<AiInsight> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InsightError::EmptyResponse);
    }

    serde_json::from_str(text).map_err(|e| {
        tracing::warn!(response = text, "failed to parse AI response JSON");
        InsightError::InvalidFormat(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_insight() {
        let insight = parse_insight(
            r#"{"meditation": "묵상", "prayer": "기도", "verseSuggestion": "시편 23:1"}"#,
        )
        .unwrap();
        assert_eq!(insight.meditation, "묵상");
        assert_eq!(insight.verse_suggestion, "시편 23:1");
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(matches!(parse_insight("  "), Err(InsightError::EmptyResponse)));
    }

    #[test]
    fn test_parse_partial_insight_is_error() {
        let result = parse_insight(r#"{"meditation": "묵상", "prayer": "기도"}"#);
        assert!(matches!(result, Err(InsightError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_non_json() {
        let result = parse_insight("오늘도 수고하셨습니다");
        assert!(matches!(result, Err(InsightError::InvalidFormat(_))));
    }
}
