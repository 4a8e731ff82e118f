use anyhow::{Context, Result};
use pii_config::Config;
use pii_core::RawRecord;
use pii_engine::{BatchSummary, RecordOutcome, RecordProcessor, process_batch};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Written in place of the payload when a row's JSON could not be parsed
const MALFORMED_PAYLOAD: &str = r#"{"error": "Invalid JSON format"}"#;

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    record_id: &'a str,
    redacted_data_json: String,
    is_pii: bool,
}

impl<'a> OutputRow<'a> {
    fn from_outcome(raw: &'a RawRecord, outcome: &RecordOutcome) -> Self {
        match outcome {
            Ok(record) => Self {
                record_id: &raw.record_id,
                redacted_data_json: record.redacted_data_json(),
                is_pii: record.is_pii,
            },
            Err(_) => Self {
                record_id: &raw.record_id,
                redacted_data_json: MALFORMED_PAYLOAD.to_string(),
                is_pii: false,
            },
        }
    }
}

pub fn handle(config: &Config, input: &Path, output: &Path) -> Result<()> {
    println!("Redacting {}...", input.display());

    let summary = redact_file(config, input, output)?;

    println!("✓ Wrote {}", output.display());
    println!("  Records: {}", summary.total);
    println!("  With PII: {}", summary.pii);
    println!("  Clean: {}", summary.clean);
    if summary.malformed > 0 {
        println!("  Malformed: {}", summary.malformed);
    }
    if summary.with_anomalies > 0 {
        println!("  With unsupported values: {}", summary.with_anomalies);
    }

    Ok(())
}

/// Read `record_id,data_json` rows, redact them, write `record_id,redacted_data_json,is_pii`
pub fn redact_file(config: &Config, input: &Path, output: &Path) -> Result<BatchSummary> {
    let records = read_records(input)?;
    let processor = RecordProcessor::new(config);

    let outcomes = process_batch(&processor, &records);

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (raw, outcome) in records.iter().zip(&outcomes) {
        writer.serialize(OutputRow::from_outcome(raw, outcome))?;
    }
    writer.flush()?;

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        pii = summary.pii,
        malformed = summary.malformed,
        "redaction complete"
    );

    Ok(summary)
}

fn read_records(input: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    let headers = reader.headers()?.clone();
    for column in ["record_id", "data_json"] {
        if !headers.iter().any(|h| h == column) {
            anyhow::bail!("{} has no '{}' column", input.display(), column);
        }
    }

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RawRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            // Header is line 1
            Err(e) => warn!(line = line + 2, error = %e, "skipping unreadable CSV row"),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("input.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_redact_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "record_id,data_json\n\
             1,\"{\"\"name\"\": \"\"John Doe\"\", \"\"phone\"\": \"\"9876543210\"\"}\"\n\
             2,\"{\"\"city\"\": \"\"Springfield\"\"}\"\n\
             3,\"{broken\"\n",
        );
        let output = dir.path().join("output.csv");

        let summary = redact_file(&Config::default(), &input, &output).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.pii, 1);
        assert_eq!(summary.malformed, 1);

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["record_id", "redacted_data_json", "is_pii"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], r#"{"name":"John Doe","phone":"98XXXXXX10"}"#);
        assert_eq!(&rows[0][2], "true");
        assert_eq!(&rows[1][1], r#"{"city":"Springfield"}"#);
        assert_eq!(&rows[1][2], "false");
        assert_eq!(&rows[2][1], MALFORMED_PAYLOAD);
        assert_eq!(&rows[2][2], "false");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "source,record_id,data_json\nweb,9,\"{\"\"passport\"\": \"\"A1234567\"\"}\"\n",
        );
        let output = dir.path().join("output.csv");

        let summary = redact_file(&Config::default(), &input, &output).unwrap();
        assert_eq!(summary.pii, 1);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "id,payload\n1,{}\n");
        let output = dir.path().join("output.csv");

        let err = redact_file(&Config::default(), &input, &output).unwrap_err();
        assert!(err.to_string().contains("data_json"));
    }
}
