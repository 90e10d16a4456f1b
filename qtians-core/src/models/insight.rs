use serde::{Deserialize, Serialize};
use std::fmt;

/// Pastoral feedback derived from one reflection. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiInsight {
    pub meditation: String,
    pub prayer: String,
    #[serde(rename = "verseSuggestion")]
    pub verse_suggestion: String,
}

impl fmt::Display for AiInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "오늘의 묵상 피드백")?;
        writeln!(f, "{}", "-".repeat(30))?;
        writeln!(f, "{}", self.meditation)?;
        writeln!(f)?;
        writeln!(f, "마음을 담은 기도")?;
        writeln!(f, "{}", "-".repeat(30))?;
        writeln!(f, "\"{}\"", self.prayer)?;
        writeln!(f)?;
        write!(f, "추천 성경 구절: {}", self.verse_suggestion)
    }
}
