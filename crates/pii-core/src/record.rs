//! Record model

use crate::{FieldAnomaly, FieldDetection, RecordError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name → raw JSON value, in input order
pub type FieldMap = serde_json::Map<String, Value>;

/// A row as supplied by the CSV reader, before the payload is parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub record_id: String,
    pub data_json: String,
}

impl RawRecord {
    pub fn new(record_id: impl Into<String>, data_json: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            data_json: data_json.into(),
        }
    }

    pub fn parse(&self) -> Result<Record> {
        Record::from_json(&self.record_id, &self.data_json)
    }
}

/// One parsed input record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Parse a JSON object payload. Anything but an object is malformed.
    pub fn from_json(id: &str, data_json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(data_json).map_err(|e| RecordError::malformed(id, e))?;

        match value {
            Value::Object(fields) => Ok(Self::new(id, fields)),
            other => Err(RecordError::malformed(
                id,
                format!("expected a JSON object, found {}", value_kind(&other)),
            )),
        }
    }

    /// Normalized view of every field, in input order
    pub fn normalized(&self) -> impl Iterator<Item = (&str, FieldText)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), FieldText::from_value(value)))
    }
}

/// Normalized field value used by the classifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldText {
    /// Trimmed string, or a number rendered as its JSON text
    Text(String),
    /// Null and blank strings carry nothing to classify
    Empty,
    /// Booleans, arrays and objects. Reported as anomalies, never masked.
    Unsupported(&'static str),
}

impl FieldText {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Self::Empty
                } else {
                    Self::Text(trimmed.to_string())
                }
            }
            Value::Number(n) => Self::Text(n.to_string()),
            Value::Null => Self::Empty,
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                Self::Unsupported(value_kind(value))
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Output record: same keys and order as the input, flagged values masked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedRecord {
    pub id: String,
    pub fields: FieldMap,
    pub is_pii: bool,
    #[serde(default)]
    pub detections: Vec<FieldDetection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<FieldAnomaly>,
}

impl RedactedRecord {
    /// The `redacted_data_json` column
    pub fn redacted_data_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let record = Record::from_json("1", r#"{"name": "John Doe", "age": 25}"#).unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields["age"], json!(25));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Record::from_json("7", "{not json").unwrap_err();
        assert_eq!(err.record_id(), "7");
        assert!(matches!(err, RecordError::MalformedInput { .. }));
    }

    #[test]
    fn test_parse_non_object() {
        let err = Record::from_json("8", "[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_field_order_preserved() {
        let record = Record::from_json("1", r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        let names: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(
            FieldText::from_value(&json!("  Mumbai ")),
            FieldText::Text("Mumbai".to_string())
        );
        assert_eq!(
            FieldText::from_value(&json!(9876543210u64)),
            FieldText::Text("9876543210".to_string())
        );
        assert_eq!(FieldText::from_value(&json!("   ")), FieldText::Empty);
        assert_eq!(FieldText::from_value(&json!(null)), FieldText::Empty);
        assert_eq!(
            FieldText::from_value(&json!(true)),
            FieldText::Unsupported("bool")
        );
        assert_eq!(
            FieldText::from_value(&json!({"a": 1})),
            FieldText::Unsupported("object")
        );
        assert_eq!(FieldText::from_value(&json!([1])).as_text(), None);
    }

    #[test]
    fn test_redacted_data_json() {
        let mut fields = FieldMap::new();
        fields.insert("phone".to_string(), json!("98XXXXXX10"));
        fields.insert("age".to_string(), json!(25));
        let record = RedactedRecord {
            id: "1".to_string(),
            fields,
            is_pii: true,
            detections: Vec::new(),
            anomalies: Vec::new(),
        };
        assert_eq!(
            record.redacted_data_json(),
            r#"{"phone":"98XXXXXX10","age":25}"#
        );
    }
}
