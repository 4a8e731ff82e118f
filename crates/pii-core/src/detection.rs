//! Detection model: what was found in a record and how

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of PII categories the engine detects and masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    Phone,
    /// 12-digit national identifier (Aadhaar format)
    NationalId,
    Passport,
    /// UPI-style `handle@provider`
    PaymentHandle,
    Name,
    Email,
    Address,
    /// IP address / device identifier bundle
    DeviceContext,
    OtherCombinatorial,
}

impl PiiType {
    pub const ALL: [PiiType; 9] = [
        PiiType::Phone,
        PiiType::NationalId,
        PiiType::Passport,
        PiiType::PaymentHandle,
        PiiType::Name,
        PiiType::Email,
        PiiType::Address,
        PiiType::DeviceContext,
        PiiType::OtherCombinatorial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::NationalId => "national_id",
            Self::Passport => "passport",
            Self::PaymentHandle => "payment_handle",
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
            Self::DeviceContext => "device_context",
            Self::OtherCombinatorial => "other_combinatorial",
        }
    }

    /// Types a standalone recognizer can produce, in match priority order
    pub fn standalone() -> &'static [PiiType] {
        &[
            PiiType::Phone,
            PiiType::NationalId,
            PiiType::Passport,
            PiiType::PaymentHandle,
        ]
    }

    pub fn is_standalone(&self) -> bool {
        Self::standalone().contains(self)
    }

    /// Higher wins when several combinatorial rules flag the same field
    pub fn specificity(&self) -> u8 {
        match self {
            Self::OtherCombinatorial => 0,
            Self::DeviceContext => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionKind {
    Standalone,
    Combinatorial,
}

/// One flagged field within one record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDetection {
    pub field_name: String,
    pub pii_type: PiiType,
    pub detection_kind: DetectionKind,
}

impl FieldDetection {
    pub fn standalone(field_name: impl Into<String>, pii_type: PiiType) -> Self {
        Self {
            field_name: field_name.into(),
            pii_type,
            detection_kind: DetectionKind::Standalone,
        }
    }

    pub fn combinatorial(field_name: impl Into<String>, pii_type: PiiType) -> Self {
        Self {
            field_name: field_name.into(),
            pii_type,
            detection_kind: DetectionKind::Combinatorial,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Value is not a string, number, bool or null
    UnknownFieldType { found: String },
}

/// Field-level problem that did not stop the record from being classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAnomaly {
    pub field_name: String,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

impl FieldAnomaly {
    pub fn unknown_type(field_name: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            kind: AnomalyKind::UnknownFieldType {
                found: found.into(),
            },
        }
    }
}

/// Outcome of classifying one record, before any masking.
///
/// `is_pii` is derived from the flagged set, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    flagged_fields: BTreeMap<String, FieldDetection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    anomalies: Vec<FieldAnomaly>,
}

impl ClassificationResult {
    pub fn new(
        flagged: impl IntoIterator<Item = FieldDetection>,
        anomalies: Vec<FieldAnomaly>,
    ) -> Self {
        let flagged_fields = flagged
            .into_iter()
            .map(|d| (d.field_name.clone(), d))
            .collect();

        Self {
            flagged_fields,
            anomalies,
        }
    }

    pub fn is_pii(&self) -> bool {
        !self.flagged_fields.is_empty()
    }

    /// Detections ordered by field name
    pub fn flagged_fields(&self) -> impl Iterator<Item = &FieldDetection> {
        self.flagged_fields.values()
    }

    pub fn detection_for(&self, field_name: &str) -> Option<&FieldDetection> {
        self.flagged_fields.get(field_name)
    }

    pub fn len(&self) -> usize {
        self.flagged_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flagged_fields.is_empty()
    }

    pub fn anomalies(&self) -> &[FieldAnomaly] {
        &self.anomalies
    }

    pub fn into_parts(self) -> (Vec<FieldDetection>, Vec<FieldAnomaly>) {
        (self.flagged_fields.into_values().collect(), self.anomalies)
    }
}
