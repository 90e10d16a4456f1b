use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::DevotionalRecord;

/// Identity fields of the most recent submission, used to pre-fill the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterProfile {
    pub name: String,
    pub chapel: String,
    pub village: String,
}

impl SubmitterProfile {
    pub fn new(
        name: impl Into<String>,
        chapel: impl Into<String>,
        village: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            chapel: chapel.into(),
            village: village.into(),
        }
    }

    pub fn from_record(record: &DevotionalRecord) -> Self {
        Self::new(&record.name, &record.chapel, &record.village)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.chapel.is_empty() && self.village.is_empty()
    }
}

impl fmt::Display for SubmitterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.chapel, self.village)
    }
}
