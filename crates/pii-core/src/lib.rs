//! Core domain models for pii-redact
//!
//! This crate contains:
//! - Record model (input field maps and their normalized view)
//! - Detection model (PII types, detections, classification results)
//! - Per-record error taxonomy

pub mod detection;
pub mod error;
pub mod record;

pub use detection::{
    AnomalyKind, ClassificationResult, DetectionKind, FieldAnomaly, FieldDetection, PiiType,
};
pub use error::{RecordError, Result};
pub use record::{FieldMap, FieldText, RawRecord, Record, RedactedRecord};
