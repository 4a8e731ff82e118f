use thiserror::Error;

/// Failure scoped to a single record. Never aborts a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Malformed input for record {record_id}: {reason}")]
    MalformedInput { record_id: String, reason: String },
}

impl RecordError {
    pub fn malformed(record_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedInput {
            record_id: record_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            Self::MalformedInput { record_id, .. } => record_id,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
