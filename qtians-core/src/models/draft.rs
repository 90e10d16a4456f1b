use serde::{Deserialize, Serialize};

use super::profile::SubmitterProfile;

/// The five form fields of a devotional entry before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub date: String,
    pub name: String,
    pub chapel: String,
    pub village: String,
    pub scripture: String,
}

impl SubmissionDraft {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Pre-fills the identity fields from the last submitter.
    pub fn with_profile(mut self, profile: &SubmitterProfile) -> Self {
        self.name = profile.name.clone();
        self.chapel = profile.chapel.clone();
        self.village = profile.village.clone();
        self
    }

    pub fn with_scripture(mut self, scripture: impl Into<String>) -> Self {
        self.scripture = scripture.into();
        self
    }

    /// Names of the fields that are empty or whitespace-only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("date", &self.date),
            ("name", &self.name),
            ("chapel", &self.chapel),
            ("village", &self.village),
            ("scripture", &self.scripture),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Clears the reflection only; identity fields stay for the next entry.
    pub fn clear_reflection(&mut self) {
        self.scripture.clear();
    }
}
