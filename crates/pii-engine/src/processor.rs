use std::collections::HashMap;

use pii_config::Config;
use pii_core::{
    ClassificationResult, FieldAnomaly, FieldText, RawRecord, Record, RecordError,
    RedactedRecord,
};
use pii_security::{PatternLibrary, Redactor};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{CombinatorialClassifier, StandaloneClassifier};

/// Classification plus the canonical forms standalone recognizers produced
struct Detections {
    result: ClassificationResult,
    canonical: HashMap<String, String>,
}

/// Runs both classifiers over a record and masks what they flag
pub struct RecordProcessor {
    standalone: StandaloneClassifier,
    combinatorial: CombinatorialClassifier,
    redactor: Redactor,
}

impl RecordProcessor {
    pub fn new(config: &Config) -> Self {
        Self {
            standalone: StandaloneClassifier::new(
                PatternLibrary::new(&config.payment),
                config.standalone.clone(),
            ),
            combinatorial: CombinatorialClassifier::new(config),
            redactor: Redactor::new(config.sentinels.clone()),
        }
    }

    /// Decide which fields are PII without masking anything
    pub fn classify(&self, record: &Record) -> ClassificationResult {
        self.detect(record).result
    }

    /// Classify and mask one record. Unflagged fields pass through verbatim.
    pub fn process(&self, record: &Record) -> RedactedRecord {
        let Detections { result, canonical } = self.detect(record);
        let mut fields = record.fields.clone();

        for detection in result.flagged_fields() {
            let name = &detection.field_name;
            let source = match canonical.get(name) {
                Some(canonical) => canonical.clone(),
                None => match record.fields.get(name).map(FieldText::from_value) {
                    Some(FieldText::Text(text)) => text,
                    _ => continue,
                },
            };

            let masked = self.redactor.redact(detection.pii_type, &source);
            if let Some(value) = fields.get_mut(name) {
                *value = Value::String(masked);
            }
        }

        let is_pii = result.is_pii();
        let (detections, anomalies) = result.into_parts();

        RedactedRecord {
            id: record.id.clone(),
            fields,
            is_pii,
            detections,
            anomalies,
        }
    }

    /// Parse the JSON payload, then [`process`](Self::process) it
    pub fn process_raw(&self, raw: &RawRecord) -> Result<RedactedRecord, RecordError> {
        let record = raw.parse().inspect_err(|e| {
            warn!(record_id = %raw.record_id, error = %e, "skipping malformed record");
        })?;

        Ok(self.process(&record))
    }

    fn detect(&self, record: &Record) -> Detections {
        let fields: Vec<(&str, FieldText)> = record.normalized().collect();

        let anomalies: Vec<FieldAnomaly> = fields
            .iter()
            .filter_map(|(name, text)| match text {
                FieldText::Unsupported(found) => Some(FieldAnomaly::unknown_type(*name, *found)),
                _ => None,
            })
            .collect();

        for anomaly in &anomalies {
            warn!(
                record_id = %record.id,
                field = %anomaly.field_name,
                "unsupported field value type, passing through unmasked"
            );
        }

        let hits = self.standalone.classify(&fields);
        let identified: Vec<&str> = hits.iter().map(|h| h.field_name.as_str()).collect();
        let combos = self.combinatorial.classify(&fields, &identified);

        // Standalone detections win over combinatorial ones on the same field
        let mut merged: HashMap<String, _> = combos
            .into_iter()
            .map(|d| (d.field_name.clone(), d))
            .collect();
        let mut canonical = HashMap::new();

        for hit in hits {
            merged.insert(hit.field_name.clone(), hit.detection());
            canonical.insert(hit.field_name, hit.matched.canonical);
        }

        for detection in merged.values() {
            debug!(
                record_id = %record.id,
                field = %detection.field_name,
                pii_type = %detection.pii_type,
                kind = ?detection.detection_kind,
                "flagged field"
            );
        }

        Detections {
            result: ClassificationResult::new(merged.into_values(), anomalies),
            canonical,
        }
    }
}

impl Default for RecordProcessor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
