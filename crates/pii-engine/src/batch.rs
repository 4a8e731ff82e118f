//! Parallel processing of many records
//!
//! Records are independent, so they are fanned out over rayon's pool. Output
//! order matches input order and a malformed record only affects its own slot.

use pii_core::{RawRecord, RecordError, RedactedRecord};
use rayon::prelude::*;

use crate::RecordProcessor;

pub type RecordOutcome = Result<RedactedRecord, RecordError>;

pub fn process_batch(processor: &RecordProcessor, records: &[RawRecord]) -> Vec<RecordOutcome> {
    records
        .par_iter()
        .map(|raw| processor.process_raw(raw))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub pii: usize,
    pub clean: usize,
    pub malformed: usize,
    /// Records with at least one field passed through as an unsupported type
    pub with_anomalies: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            match outcome {
                Ok(record) => {
                    if record.is_pii {
                        summary.pii += 1;
                    } else {
                        summary.clean += 1;
                    }
                    if !record.anomalies.is_empty() {
                        summary.with_anomalies += 1;
                    }
                }
                Err(_) => summary.malformed += 1,
            }
            summary
        })
    }
}
