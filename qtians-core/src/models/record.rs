use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::draft::SubmissionDraft;
use crate::date::normalize_date;

/// One member's daily scripture reading and reflection.
///
/// Rows fetched from the spreadsheet are loosely typed: ids may be row
/// numbers, dates may carry a time part, and extra columns may appear. Scalars
/// are accepted as strings and unknown columns are kept in `extra` so they
/// survive the round trip through the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevotionalRecord {
    #[serde(default = "new_record_id", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chapel: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub village: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scripture: String,
    /// Client-side creation instant in epoch milliseconds. Display ordering only.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DevotionalRecord {
    pub fn new(
        date: impl AsRef<str>,
        name: impl Into<String>,
        chapel: impl Into<String>,
        village: impl Into<String>,
        scripture: impl Into<String>,
    ) -> Self {
        Self {
            id: new_record_id(),
            date: normalize_date(date.as_ref()),
            name: name.into(),
            chapel: chapel.into(),
            village: village.into(),
            scripture: scripture.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            extra: Map::new(),
        }
    }

    /// Builds a record from a completed form draft.
    pub fn from_draft(draft: &SubmissionDraft) -> Self {
        Self::new(
            &draft.date,
            draft.name.trim(),
            draft.chapel.trim(),
            draft.village.trim(),
            draft.scripture.clone(),
        )
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Canonical date and trimmed group fields, as the history store keeps them.
    pub fn normalized(mut self) -> Self {
        self.date = normalize_date(&self.date);
        self.chapel = self.chapel.trim().to_string();
        self.village = self.village.trim().to_string();
        self
    }

    /// Key/value pairs posted to the spreadsheet write endpoint.
    pub fn form_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("date", self.date.as_str()),
            ("name", self.name.as_str()),
            ("chapel", self.chapel.as_str()),
            ("village", self.village.as_str()),
            ("scripture", self.scripture.as_str()),
        ]
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

impl fmt::Display for DevotionalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.date, self.name)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "Chapel:  {}", self.chapel)?;
        writeln!(f, "Village: {}", self.village)?;
        writeln!(f, "\n{}", self.scripture)?;

        if let Some(created) = self.created_at() {
            writeln!(f, "\nRecorded: {}", created.format("%Y-%m-%d %H:%M"))?;
        }

        Ok(())
    }
}

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a scalar value, found {}",
            other
        ))),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new_normalizes_date() {
        let record = DevotionalRecord::new("2026. 2. 1", "김민수", "1마을", "본당 고등부", "시편 23편");

        assert_eq!(record.date, "2026-02-01");
        assert_eq!(record.name, "김민수");
        assert!(!record.id.is_empty());
        assert!(record.timestamp.is_some());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = DevotionalRecord::new("2026-02-01", "a", "c", "v", "s");
        let b = DevotionalRecord::new("2026-02-01", "a", "c", "v", "s");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_form_fields_order_and_keys() {
        let record = DevotionalRecord::new("2026-02-01", "n", "c", "v", "s");
        let keys: Vec<&str> = record.form_fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["date", "name", "chapel", "village", "scripture"]);
    }

    #[test]
    fn test_deserialize_spreadsheet_row() {
        let json = r#"{
            "id": 17,
            "date": "2026. 1. 22",
            "name": "이영희",
            "chapel": " 본당 고등부 ",
            "village": 3,
            "scripture": "요한복음 3장",
            "timestamp": "1769040000000",
            "memo": "extra column"
        }"#;

        let record: DevotionalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "17");
        assert_eq!(record.village, "3");
        assert_eq!(record.timestamp, Some(1769040000000));
        assert_eq!(record.extra.get("memo"), Some(&Value::from("extra column")));

        let record = record.normalized();
        assert_eq!(record.date, "2026-01-22");
        assert_eq!(record.chapel, "본당 고등부");
    }

    #[test]
    fn test_deserialize_missing_id_generates_one() {
        let json = r#"{"date": "2026-01-22", "name": "a", "chapel": "b", "village": "c", "scripture": null}"#;
        let record: DevotionalRecord = serde_json::from_str(json).unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.scripture, "");
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_deserialize_rejects_nested_values() {
        let json = r#"{"date": ["2026"], "name": "a", "chapel": "b", "village": "c", "scripture": "d"}"#;
        assert!(serde_json::from_str::<DevotionalRecord>(json).is_err());
    }

    #[test]
    fn test_record_display() {
        let record = DevotionalRecord::new("2026-02-01", "김민수", "1마을", "본당 고등부", "시편 23편");
        let output = format!("{}", record);

        assert!(output.contains("2026-02-01"));
        assert!(output.contains("김민수"));
        assert!(output.contains("시편 23편"));
    }

    #[test]
    fn test_cache_roundtrip_keeps_extra_columns() {
        let json = r#"{"id": "x", "date": "2026-01-22", "name": "a", "chapel": "b", "village": "c", "scripture": "d", "row": 5}"#;
        let record: DevotionalRecord = serde_json::from_str(json).unwrap();

        let cached = serde_json::to_string(&record).unwrap();
        let parsed: DevotionalRecord = serde_json::from_str(&cached).unwrap();
        assert_eq!(parsed, record);
        assert!(!cached.contains("timestamp"));
    }
}
